// Packages an intensity program for an EnergyPlus host as an EMS global variable declaration and an
// Erl program that the host runs at every system timestep.

use crate::core::intensity::IntensityProgram;
use convert_case::{Case, Casing};
use std::fmt::{Display, Formatter};

/// Turns a program name into a valid Erl identifier.
pub fn erl_identifier(name: &str) -> String {
    let identifier: String = name
        .to_case(Case::Snake)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    match identifier.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => identifier,
        _ => format!("fault_{identifier}"),
    }
}

pub struct ErlProgram<'a> {
    program: &'a IntensityProgram,
    identifier: String,
}

impl<'a> ErlProgram<'a> {
    pub fn new(program: &'a IntensityProgram) -> Self {
        Self {
            identifier: erl_identifier(program.name()),
            program,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn current_variable(&self) -> String {
        format!("AF_current_{}", self.identifier)
    }

    pub fn previous_variable(&self) -> String {
        format!("AF_previous_{}", self.identifier)
    }
}

impl IntensityProgram {
    pub fn to_erl(&self) -> ErlProgram<'_> {
        ErlProgram::new(self)
    }
}

impl Display for ErlProgram<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let current = self.current_variable();
        let previous = self.previous_variable();
        let start = self.program.start();
        let end = self.program.end();
        let (sm, sd, sh) = (start.month, start.day, start.hour);
        let (em, ed, eh) = (end.month, end.day, end.hour);

        writeln!(f, "EnergyManagementSystem:GlobalVariable,")?;
        writeln!(f, "  {current},")?;
        writeln!(f, "  {previous};")?;
        writeln!(f)?;
        writeln!(f, "EnergyManagementSystem:Program,")?;
        writeln!(f, "  {}_intensity,", self.identifier)?;
        writeln!(f, "  SET SM = Month,")?;
        writeln!(f, "  SET SD = DayOfMonth,")?;
        writeln!(f, "  SET SH = Hour,")?;
        writeln!(f, "  SET TAU = {},", self.program.effective_time_constant())?;
        writeln!(f, "  SET IN_WINDOW = 0,")?;
        writeln!(
            f,
            "  IF (SM > {sm}) || (SM == {sm} && SD > {sd}) || (SM == {sm} && SD == {sd} && SH >= {sh}),"
        )?;
        writeln!(
            f,
            "    IF (SM < {em}) || (SM == {em} && SD < {ed}) || (SM == {em} && SD == {ed} && SH <= {eh}),"
        )?;
        writeln!(f, "      SET IN_WINDOW = 1,")?;
        writeln!(f, "    ENDIF,")?;
        writeln!(f, "  ENDIF,")?;
        writeln!(f, "  IF IN_WINDOW == 1,")?;
        writeln!(f, "    SET {current} = {previous} + SystemTimeStep / TAU,")?;
        writeln!(f, "    IF {current} > 1.0,")?;
        writeln!(f, "      SET {current} = 1.0,")?;
        writeln!(f, "    ENDIF,")?;
        writeln!(f, "  ELSE,")?;
        writeln!(f, "    SET {current} = 0.0,")?;
        writeln!(f, "  ENDIF,")?;
        writeln!(f, "  SET {previous} = {current};")
    }
}

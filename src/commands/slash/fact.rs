//! # Fact Command
//!
//! `/fact` - a random fact.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_fact_command()]
}

fn create_fact_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command.name("fact").description("Learn a random fact");
    command
}

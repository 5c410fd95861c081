//! # Report Command
//!
//! `/report` with a period choice.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_report_command()]
}

fn create_report_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("report")
        .description("Income/expense summary for a period")
        .create_option(|option| {
            option
                .name("period")
                .description("Which period to summarize (default: all time)")
                .kind(CommandOptionType::String)
                .required(false)
                .add_string_choice("all time", "all")
                .add_string_choice("today", "today")
                .add_string_choice("week", "week")
                .add_string_choice("year", "year")
        });
    command
}

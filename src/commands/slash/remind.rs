//! # Reminder Commands
//!
//! `/notify` creates a reminder, `/reminders` lists or removes them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_notify_command(), create_reminders_command()]
}

fn create_notify_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("notify")
        .description("Create a reminder; omit the options to enter it in chat")
        .create_option(|option| {
            option
                .name("time")
                .description("Time of day, HH:MM (e.g. 20:30)")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("message")
                .description("What to remind you about")
                .kind(CommandOptionType::String)
                .required(false)
        });
    command
}

fn create_reminders_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("reminders")
        .description("List your active reminders or remove one")
        .create_option(|option| {
            option
                .name("action")
                .description("What to do")
                .kind(CommandOptionType::String)
                .required(false)
                .add_string_choice("list", "list")
                .add_string_choice("remove", "remove")
        })
        .create_option(|option| {
            option
                .name("number")
                .description("Reminder number from the list (for remove)")
                .kind(CommandOptionType::Integer)
                .required(false)
        });
    command
}

// SPDX-FileCopyrightText: 2026 Third Voice Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thirdvoice contact` subcommands.

use thirdvoice_core::ThirdVoiceError;

use crate::ContactCommand;
use crate::app::App;

pub async fn run_contact(app: &App, command: ContactCommand) -> Result<(), ThirdVoiceError> {
    match command {
        ContactCommand::Add { name, context } => {
            let contact = app.coach.add_contact(&name, context).await?;
            println!("Added {} ({})", contact.name, contact.context);
        }
        ContactCommand::List => {
            let contacts = app.coach.list_contacts().await?;
            if contacts.is_empty() {
                println!("No contacts yet. Add one with `thirdvoice contact add <name>`.");
            }
            for contact in contacts {
                println!(
                    "  {:<20} {:<12} {}",
                    contact.name,
                    contact.context.to_string(),
                    contact.context.description()
                );
            }
        }
        ContactCommand::Rename {
            name,
            new_name,
            context,
        } => {
            let contact = app.coach.rename_contact(&name, &new_name, context).await?;
            println!("Renamed {name} to {} ({})", contact.name, contact.context);
        }
        ContactCommand::Remove { name } => {
            app.coach.delete_contact(&name).await?;
            println!("Removed {name} and their history");
        }
    }
    Ok(())
}

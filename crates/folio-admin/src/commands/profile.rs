use super::{print_json, request};
use crate::app::App;
use crate::cli::{ProfileArgs, ProfileCommand};
use anyhow::Result;
use folio_core::Profile;

pub(super) async fn run(app: &App, cmd: ProfileCommand, json: bool) -> Result<()> {
    match cmd {
        ProfileCommand::Show => {
            let profile = request(app.content.get_profile()).await?;
            match (profile, json) {
                (Some(profile), true) => print_json(&profile)?,
                (None, true) => println!("null"),
                (Some(profile), false) => print_profile(&profile),
                (None, false) => println!("No profile yet. Use `profile set` to create one."),
            }
            Ok(())
        }
        ProfileCommand::Set(args) => {
            let mut profile = request(app.content.get_profile())
                .await?
                .unwrap_or_default();
            apply(&mut profile, args);
            request(app.content.update_profile(&profile)).await?;
            println!("Profile saved");
            Ok(())
        }
    }
}

/// Overlay the given fields; list flags replace the whole list.
fn apply(profile: &mut Profile, args: ProfileArgs) {
    let fields = [
        (args.name, &mut profile.name),
        (args.role, &mut profile.role),
        (args.description, &mut profile.description),
        (args.whatsapp, &mut profile.whatsapp),
        (args.instagram, &mut profile.instagram),
        (args.email, &mut profile.email),
    ];
    for (value, field) in fields {
        if let Some(value) = value {
            *field = value;
        }
    }

    if !args.services.is_empty() {
        profile.services.clear();
        for service in &args.services {
            profile.add_service(service);
        }
    }
    if !args.skills.is_empty() {
        profile.skills.clear();
        for skill in &args.skills {
            profile.add_skill(skill);
        }
    }
}

fn print_profile(profile: &Profile) {
    println!("{} - {}", profile.name, profile.role);
    if !profile.description.is_empty() {
        println!("\n{}\n", profile.description);
    }
    println!("Services:  {}", profile.services.join(", "));
    println!("Skills:    {}", profile.skills.join(", "));
    println!("WhatsApp:  {}", profile.whatsapp);
    println!("Instagram: {}", profile.instagram);
    println!("Email:     {}", profile.email);
}

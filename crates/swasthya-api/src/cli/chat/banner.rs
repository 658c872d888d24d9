//! Welcome banner printed when a chat session starts.

use console::style;

use swasthya_types::auth::UserProfile;
use swasthya_types::language::Language;

pub fn print_welcome_banner(language: Language, gateway_url: &str, user: Option<&UserProfile>) {
    println!();
    println!(
        "  {} {}",
        style("+").red().bold(),
        style("Swasthya health assistant").cyan().bold()
    );
    println!(
        "  {}",
        style("Health guidance for rural India. In an emergency, contact your ASHA worker or the nearest hospital.").dim()
    );
    println!();
    println!(
        "  {}  {} ({})",
        style("Language:").bold(),
        language.native_name(),
        style(language.code()).dim()
    );
    println!("  {}   {}", style("Gateway:").bold(), style(gateway_url).dim());
    match user {
        Some(user) => println!(
            "  {}      {} {}",
            style("User:").bold(),
            user.full_name,
            style(format!("({})", user.user_type)).dim()
        ),
        None => println!(
            "  {}      {}",
            style("User:").bold(),
            style("not logged in").yellow()
        ),
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, /quick for common questions, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
}

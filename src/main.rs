use clap::Parser;
use skilltrack::cli::{handle_init, handle_serve, handle_user_add, Cli, Commands, UserAction};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(&cli.db),
        Commands::User(user) => match user.action {
            UserAction::Add { username } => handle_user_add(&cli.db, &username),
        },
        Commands::Serve { bind } => handle_serve(&cli.db, &bind),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! `carrent` - CLI for carrental
//!
//! Each invocation performs one action: bootstrap, signup, or a single admin
//! or user operation behind a login.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use carrental::cli::output::{render_cars, render_log};
use carrental::cli::{
    AdminArgs, AdminCommand, Cli, Command, ConfigCommand, UserArgs, UserCommand,
};
use carrental::{init_logging, Config, RentalDesk, Role};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd),
        command => run_with_desk(config, command),
    }
}

fn run_with_desk(config: Config, command: Command) -> anyhow::Result<()> {
    let desk = RentalDesk::open(config).context("opening record store")?;
    let added = desk.bootstrap().context("bootstrapping record stores")?;

    match command {
        Command::Init => {
            println!("Stores ready in {}", desk.config().data_dir().display());
            println!("Sample cars added: {added}");
        }
        Command::Signup(cmd) => {
            let role = Role::from(cmd.role);
            desk.signup(role, &cmd.username, &cmd.password)?;
            println!("{} registered", capitalized(role));
        }
        Command::Admin(args) => handle_admin(&desk, args)?,
        Command::User(args) => handle_user(&desk, args)?,
        Command::Config(cmd) => handle_config(desk.config(), cmd)?,
    }
    Ok(())
}

fn handle_admin(desk: &RentalDesk, args: AdminArgs) -> anyhow::Result<()> {
    let session = desk.login(Role::Admin, &args.login.username, &args.login.password)?;

    match args.command {
        AdminCommand::Add {
            model,
            kind,
            year,
            rate,
        } => {
            desk.add_car(&session, &model, &kind, year, rate)?;
            println!("Car added");
        }
        AdminCommand::Remove { model } => {
            let removed = desk.remove_car(&session, &model)?;
            println!("Car removed ({removed} record(s))");
        }
        AdminCommand::Cars { available, format } => {
            let cars = desk.cars(&session, available)?;
            let empty = if available { "No available cars" } else { "No cars" };
            println!("{}", render_cars(&cars, format, empty)?);
        }
        AdminCommand::Waiting { format } => {
            let entries = desk.waiting_log(&session)?;
            println!("{}", render_log(&entries, format, "Waiting Queue", "Queue empty")?);
        }
        AdminCommand::Returned { format } => {
            let entries = desk.returned_log(&session)?;
            println!(
                "{}",
                render_log(&entries, format, "Returned Cars", "No returned cars")?
            );
        }
    }

    session.logout();
    Ok(())
}

fn handle_user(desk: &RentalDesk, args: UserArgs) -> anyhow::Result<()> {
    let session = desk.login(Role::User, &args.login.username, &args.login.password)?;

    match args.command {
        UserCommand::Rent { model } => {
            desk.rent(&session, &model)?;
            println!("Car rented");
        }
        UserCommand::Return { model } => {
            desk.return_car(&session, &model)?;
            println!("Car returned");
        }
        UserCommand::Bookings { format } => {
            let cars = desk.bookings(&session)?;
            println!("{}", render_cars(&cars, format, "No bookings")?);
        }
    }

    session.logout();
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {:?}", config.storage.backend);
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Inventory]");
                println!("  Removal match:      {:?}", config.inventory.removal);
                println!();
                println!("[Seed]");
                println!("  Sample cars:        {}", config.seed.enabled);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn capitalized(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::User => "User",
    }
}

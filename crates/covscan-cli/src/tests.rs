use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["covscan"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_search_with_categories() {
    let cli = Cli::try_parse_from([
        "covscan",
        "search",
        "--coords",
        "41.9, 12.5",
        "--height",
        "25",
        "--lodging",
        "--industrial",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Search(args)) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(args.coords, "41.9, 12.5");
    assert_eq!(args.height, "25");
    assert_eq!(args.radius, None);
    assert!(args.lodging && !args.commercial && args.industrial);
    assert!(!args.enrich);
}

#[test]
fn search_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "covscan",
        "search",
        "--coords",
        "-33.86, 151.2",
        "--radius",
        "800",
        "--commercial",
        "--enrich",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Search(args)) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(args.coords, "-33.86, 151.2");
    assert_eq!(args.radius.as_deref(), Some("800"));
    assert_eq!(args.height, "");
    assert!(args.enrich);
}

#[test]
fn search_requires_coords() {
    assert!(Cli::try_parse_from(["covscan", "search", "--lodging"]).is_err());
}

#[test]
fn parses_range_command() {
    let cli = Cli::try_parse_from(["covscan", "range", "--height", "25"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Range { ref height }) if height == "25"
    ));
}

#[test]
fn parses_classify_command() {
    let cli = Cli::try_parse_from([
        "covscan",
        "classify",
        "--address",
        "Via Roma 1",
        "--city",
        "Roma",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Classify { ref address, ref city })
            if address == "Via Roma 1" && city == "Roma"
    ));
}

#[test]
fn parses_locate_command() {
    let cli = Cli::try_parse_from([
        "covscan",
        "locate",
        "--name",
        "Hotel Roma",
        "--coords",
        "41.9, 12.5",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Locate { ref name, .. }) if name == "Hotel Roma"
    ));
}

#[test]
fn parses_key_subcommands() {
    let cli = Cli::try_parse_from(["covscan", "key", "save", "fc-123"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Key {
            command: KeyCommands::Save { ref key }
        }) if key == "fc-123"
    ));

    let cli = Cli::try_parse_from(["covscan", "key", "test"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Key {
            command: KeyCommands::Test { key: None }
        })
    ));

    let cli = Cli::try_parse_from(["covscan", "key", "show"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Key {
            command: KeyCommands::Show
        })
    ));
}

#[test]
fn key_save_requires_a_value() {
    assert!(Cli::try_parse_from(["covscan", "key", "save"]).is_err());
}

#[test]
fn parses_shell_command() {
    let cli = Cli::try_parse_from(["covscan", "shell"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Shell)));
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

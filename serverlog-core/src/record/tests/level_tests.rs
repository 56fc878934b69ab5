use crate::record::Level;
use pretty_assertions::assert_eq;

#[test]
fn named_levels_render_their_monolog_name() {
    assert_eq!(Level::DEBUG.name(), "DEBUG");
    assert_eq!(Level::NOTICE.name(), "NOTICE");
    assert_eq!(Level::EMERGENCY.name(), "EMERGENCY");
}

#[test]
fn unknown_levels_keep_their_value() {
    assert_eq!(Level(275).name(), "LEVEL275");
    assert!(Level(275) > Level::NOTICE);
    assert!(Level(275) < Level::WARNING);
}

#[test]
fn parses_names_case_insensitively() {
    assert_eq!("warning".parse::<Level>(), Ok(Level::WARNING));
    assert_eq!("Info".parse::<Level>(), Ok(Level::INFO));
}

#[test]
fn parses_numeric_values() {
    assert_eq!("250".parse::<Level>(), Ok(Level::NOTICE));
    assert_eq!("42".parse::<Level>(), Ok(Level(42)));
}

#[test]
fn rejects_unknown_names() {
    assert!("verbose".parse::<Level>().is_err());
}

#[test]
fn parses_out_of_range_numbers() {
    assert_eq!("-1".parse::<Level>(), Ok(Level(-1)));
    assert_eq!("70000".parse::<Level>(), Ok(Level(70000)));
    assert_eq!(Level(-1).name(), "LEVEL-1");
}

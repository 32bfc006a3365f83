//! Formatter/parser agreement: what the writer emits, the parser reads back.

use sercmd::{CommandManager, Config, FrameParser, MemoryLink, Param, Step};

fn parse_all(parser: &mut FrameParser, wire: &[u8]) -> usize {
    let mut completed = 0;
    for &b in wire {
        if parser.consume(b).unwrap() == Step::Complete {
            completed += 1;
        }
    }
    completed
}

#[test]
fn formatted_command_reparses_identically() {
    let cases: &[(&str, &[(&str, &str)])] = &[
        ("PING", &[]),
        ("MOVE", &[("dir", "left")]),
        ("CFG", &[("baud", "9600"), ("parity", "none"), ("stop", "1")]),
        ("SET", &[("mode", "")]),
    ];

    for (command, pairs) in cases {
        let params: Vec<Param> = pairs.iter().map(|(k, v)| Param::new(k, v)).collect();

        let mut manager = CommandManager::new(MemoryLink::new(), Config::default()).unwrap();
        manager.send_command(command, "", "", &params).unwrap();
        let wire = manager.link_mut().take_output();

        let mut parser = FrameParser::new(&Config::default());
        assert_eq!(parse_all(&mut parser, &wire), 1, "wire: {wire:?}");
        assert_eq!(parser.command(), *command);
        assert_eq!(parser.params(), params.as_slice());
    }
}

#[test]
fn no_separator_input_is_all_command() {
    let mut parser = FrameParser::new(&Config::default());
    parse_all(&mut parser, b"  REBOOT  ;");

    assert_eq!(parser.command(), "REBOOT");
    assert_eq!(parser.params().len(), 0);
}

#[test]
fn value_boundary_is_exact() {
    let config = Config::default();

    // Exactly at the bound: fine.
    let fitting = "x".repeat(config.max_value_len);
    let mut parser = FrameParser::new(&config);
    parse_all(&mut parser, format!("C:k={fitting};").as_bytes());
    assert_eq!(parser.params()[0].value, fitting);

    // One past: the message aborts and the parser is reusable.
    let oversized = "x".repeat(config.max_value_len + 1);
    let mut parser = FrameParser::new(&config);
    let mut failed = false;
    for &b in format!("C:k={oversized};").as_bytes() {
        if parser.consume(b).is_err() {
            failed = true;
            break;
        }
    }
    assert!(failed);
    assert_eq!(parse_all(&mut parser, b"C:k=v;"), 1);
}

#[test]
fn params_past_capacity_are_dropped() {
    let config = Config::default();
    let mut parser = FrameParser::new(&config);

    let mut wire = String::from("MANY");
    for i in 0..config.max_params + 3 {
        wire.push_str(&format!(":k{i}=v{i}"));
    }
    wire.push(';');

    parse_all(&mut parser, wire.as_bytes());
    assert_eq!(parser.params().len(), config.max_params);
    assert_eq!(
        parser.params().last().unwrap(),
        &Param::new("k4", "v4"),
        "last kept parameter must be the one at the capacity boundary"
    );
}

#[test]
fn alternate_grammar_roundtrips() {
    let config = Config {
        terminator: b'\n',
        command_separator: b',',
        param_separator: b'~',
        ..Config::default()
    };

    let params = [Param::new("a", "1"), Param::new("b", "2")];
    let mut manager = CommandManager::new(MemoryLink::new(), config.clone()).unwrap();
    manager.send_command("CMD", "", "", &params).unwrap();
    let wire = manager.link_mut().take_output();
    assert_eq!(wire, b"CMD,a~1,b~2\n");

    let mut parser = FrameParser::new(&config);
    assert_eq!(parse_all(&mut parser, &wire), 1);
    assert_eq!(parser.command(), "CMD");
    assert_eq!(parser.params(), params.as_slice());
}

#[test]
fn identifier_suffix_is_outside_the_param_list() {
    let mut manager = CommandManager::new(MemoryLink::new(), Config::default()).unwrap();
    manager
        .send_command("STATE", "ready", "boot", &[])
        .unwrap();

    assert_eq!(manager.link_mut().take_output(), b"STATE:ready: (boot);");
}

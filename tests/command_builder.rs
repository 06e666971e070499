// tests/command_builder.rs

use std::error::Error;

use buildjs::command::{closure_schema, ArgumentKind, Command, CommandSchema};
use buildjs::config::CompilerSpec;
use buildjs::errors::BuildjsError;
use buildjs::types::ConfigValue;

type TestResult = Result<(), Box<dyn Error>>;

fn closure() -> Command {
    Command::new("closure", &closure_schema())
}

#[test]
fn set_then_get_returns_the_value() -> TestResult {
    let mut cmd = closure();
    cmd.set("js_output_file", "dist/app.js")?;

    let arg = cmd.get("--js_output_file")?;
    assert!(arg.is_assigned());
    assert_eq!(arg.value(), Some("dist/app.js"));
    Ok(())
}

#[test]
fn setting_a_single_value_twice_overwrites() -> TestResult {
    let mut cmd = closure();
    cmd.set("js_output_file", "a.js")?;
    cmd.set("js_output_file", "b.js")?;

    assert_eq!(cmd.format(), vec!["--js_output_file", "b.js"]);
    Ok(())
}

#[test]
fn unassigned_options_never_appear() {
    let cmd = closure();
    assert!(cmd.format().is_empty());
    assert_eq!(cmd.argv(), vec!["closure"]);
    assert!(cmd.arguments().iter().all(|a| !a.is_assigned()));
}

#[test]
fn unknown_option_is_rejected() {
    let mut cmd = closure();
    let err = cmd.set("no_such_flag", "1").unwrap_err();
    assert!(matches!(err, BuildjsError::UnknownOption(name) if name == "no_such_flag"));
    assert!(cmd.get("no_such_flag").is_err());
}

#[test]
fn enumerated_values_are_checked() -> TestResult {
    let mut cmd = closure();
    cmd.set("compilation_level", "SIMPLE")?;

    let err = cmd.set("compilation_level", "FAST").unwrap_err();
    match err {
        BuildjsError::InvalidValue { option, value, expected } => {
            assert_eq!(option, "compilation_level");
            assert_eq!(value, "FAST");
            assert!(expected.contains("ADVANCED"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // The failed assignment leaves the previous value in place.
    assert_eq!(cmd.get("compilation_level")?.value(), Some("SIMPLE"));
    Ok(())
}

#[test]
fn add_appends_repeatables_and_refuses_second_single_value() -> TestResult {
    let mut cmd = closure();
    cmd.add("js", "a.js")?;
    cmd.add("js", "b.js")?;
    assert_eq!(cmd.get("js")?.values(), ["a.js", "b.js"]);

    cmd.add("charset", "UTF-8")?;
    let err = cmd.add("charset", "ASCII").unwrap_err();
    assert!(matches!(err, BuildjsError::DuplicateOption(flag) if flag == "--charset"));
    Ok(())
}

#[test]
fn flags_serialise_only_when_enabled() -> TestResult {
    let mut cmd = closure();
    cmd.enable("debug", true)?;
    assert_eq!(cmd.format(), vec!["--debug"]);

    cmd.enable("debug", false)?;
    assert!(cmd.get("debug")?.is_assigned());
    assert!(cmd.format().is_empty());

    assert!(cmd.enable("js", true).is_err());
    Ok(())
}

#[test]
fn format_follows_schema_order_not_assignment_order() -> TestResult {
    let mut cmd = closure();
    cmd.set("warning_level", "VERBOSE")?;
    cmd.add("js", "src/**.js")?;
    cmd.enable("debug", true)?;
    cmd.set("js_output_file", "out.js")?;

    assert_eq!(
        cmd.format(),
        vec![
            "--js",
            "src/**.js",
            "--js_output_file",
            "out.js",
            "--debug",
            "--warning_level",
            "VERBOSE",
        ]
    );
    Ok(())
}

#[test]
fn remove_and_unset() -> TestResult {
    let mut cmd = closure();
    cmd.add("externs", "a.js")?;
    cmd.add("externs", "b.js")?;

    assert!(cmd.remove("externs", Some("a.js"))?);
    assert!(!cmd.remove("externs", Some("zzz.js"))?);
    assert_eq!(cmd.get("externs")?.values(), ["b.js"]);

    assert!(cmd.remove("externs", None)?);
    assert!(!cmd.get("externs")?.is_assigned());

    cmd.set("charset", "UTF-8")?;
    cmd.unset("charset")?;
    assert!(cmd.format().is_empty());
    Ok(())
}

#[test]
fn apply_maps_config_values_by_kind() -> TestResult {
    let mut cmd = closure();
    cmd.apply("debug", &ConfigValue::Bool(true))?;
    cmd.apply(
        "define",
        &ConfigValue::List(vec!["DEBUG=false".into(), "LOCALE='en'".into()]),
    )?;
    cmd.apply("compilation_level", &ConfigValue::from("ADVANCED"))?;

    assert!(cmd.get("debug")?.is_enabled());
    assert_eq!(cmd.get("define")?.values(), ["DEBUG=false", "LOCALE='en'"]);

    let err = cmd
        .apply("compilation_level", &ConfigValue::from("SIMPLE"))
        .unwrap_err();
    assert!(matches!(err, BuildjsError::DuplicateOption(_)));

    let err = cmd
        .apply("debug", &ConfigValue::Integer(2))
        .unwrap_err();
    assert!(matches!(err, BuildjsError::InvalidValue { .. }));
    Ok(())
}

#[test]
fn custom_schema_keeps_declared_prefix_and_position() -> TestResult {
    let schema = CommandSchema::new()
        .value("-O")
        .repeatable("--in")
        .flag("-O");
    assert_eq!(schema.len(), 2);
    assert_eq!(schema.options()[0].kind, ArgumentKind::Flag);

    let mut cmd = Command::new("tool", &schema);
    cmd.enable("O", true)?;
    cmd.add("in", "x")?;
    assert_eq!(cmd.argv(), vec!["tool", "-O", "--in", "x"]);
    Ok(())
}

#[test]
fn compiler_launcher_and_display_quoting() -> TestResult {
    let spec = CompilerSpec {
        program: "java".to_string(),
        leading_args: vec!["-jar".to_string(), "closure.jar".to_string()],
    };
    let mut cmd = Command::for_compiler(&spec, &closure_schema());
    cmd.add("js", "my dir/a.js")?;
    cmd.add("js", "!skip.js")?;

    assert_eq!(&cmd.argv()[..3], ["java", "-jar", "closure.jar"]);
    assert_eq!(
        cmd.to_string(),
        "java -jar closure.jar --js 'my dir/a.js' --js '!skip.js'"
    );
    Ok(())
}

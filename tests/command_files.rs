//! End-to-end tests: YAML type schema plus command file

use zonegen::zone::commands::{CommandError, CommandFileParser, CommandOutput, Condition};
use zonegen::zone::domain::snapshot;
use zonegen::zone::repository::repository_from_yaml;

const SCHEMA: &str = r#"
types:
  - kind: struct
    name: GfxImage
    members:
      - name: levelCount
        type: int
      - name: streams
        type: GfxImageStream
        array: [4]
  - kind: struct
    name: GfxImageStream
    members:
      - name: width
        type: int
      - name: pixels
        type: int
        array: [0]
  - kind: enum
    name: ImgCategory
    members:
      - name: IMG_CATEGORY_UNKNOWN
      - name: IMG_CATEGORY_LOADED
        value: 3
"#;

fn parser() -> CommandFileParser {
    let repository = repository_from_yaml(SCHEMA).expect("schema must load");
    CommandFileParser::new(repository)
}

#[test]
fn test_full_command_file() {
    let mut parser = parser();
    let outputs = parser
        .parse(
            "// image serialization directives\n\
             use GfxImage;\n\
             count streams levelCount - 1;\n\
             condition streams IMG_CATEGORY_LOADED == levelCount;\n\
             use GfxImageStream;\n\
             count pixels width * 4;\n",
        )
        .expect("command file must parse");

    assert_eq!(outputs.len(), 5);
    assert_eq!(
        outputs[0],
        CommandOutput::Use {
            type_name: "GfxImage".to_string()
        }
    );
    match &outputs[1] {
        CommandOutput::Count {
            owner,
            member_chain,
            evaluation,
        } => {
            assert_eq!(owner.name, "GfxImage");
            assert_eq!(member_chain[0].name, "streams");
            assert!(!evaluation.is_static());
        }
        other => panic!("expected count output, got {:?}", other),
    }
    match &outputs[4] {
        // after `use GfxImageStream;` bare names resolve against it first
        CommandOutput::Count { owner, .. } => assert_eq!(owner.name, "GfxImageStream"),
        other => panic!("expected count output, got {:?}", other),
    }
}

#[test]
fn test_enum_constant_resolves_inside_condition() {
    let mut parser = parser();
    let outputs = parser
        .parse("use GfxImage;\ncondition streams IMG_CATEGORY_LOADED;\n")
        .unwrap();

    match &outputs[1] {
        CommandOutput::Condition { condition, .. } => match condition {
            Condition::Evaluation(evaluation) => {
                assert_eq!(evaluation.evaluate_static().unwrap(), 3);
            }
            other => panic!("expected evaluation condition, got {:?}", other),
        },
        other => panic!("expected condition output, got {:?}", other),
    }
}

#[test]
fn test_member_path_across_types() {
    // The dotted path descends through the streams member into the stream
    // struct, resolved globally without a `use`.
    let mut parser = parser();
    let error = parser
        .parse("count GfxImage::streams::width levelCount;\n")
        .unwrap_err();

    // "levelCount" has no used type and no type-name prefix, so the
    // evaluation inside the statement fails to resolve.
    assert_eq!(
        error,
        CommandError::UnresolvedReference("levelCount".to_string())
    );

    let mut parser = parser_with_use();
    let outputs = parser
        .parse("count GfxImage::streams::width levelCount;\n")
        .unwrap();
    match &outputs[0] {
        CommandOutput::Count {
            owner,
            member_chain,
            ..
        } => {
            assert_eq!(owner.name, "GfxImage");
            let names: Vec<&str> = member_chain.iter().map(|m| m.name.as_str()).collect();
            assert_eq!(names, vec!["streams", "width"]);
        }
        other => panic!("expected count output, got {:?}", other),
    }
}

fn parser_with_use() -> CommandFileParser {
    let mut parser = parser();
    parser
        .parse("use GfxImage;\n")
        .expect("use statement must parse");
    parser
}

#[test]
fn test_syntax_error_reports_offending_line() {
    let mut parser = parser();
    let error = parser
        .parse("use GfxImage;\nuse GfxImageStream;\nreticulate splines;\n")
        .unwrap_err();
    assert_eq!(
        error,
        CommandError::Syntax {
            line: 3,
            got: "reticulate".to_string(),
        }
    );
}

#[test]
fn test_snapshot_output_shape() {
    let mut parser = parser_with_use();
    let outputs = parser.parse("count streams levelCount - 1;\n").unwrap();

    let value = outputs[0].to_snapshot();
    assert_eq!(value["command"], "count");
    assert_eq!(value["path"], "GfxImage::streams");
    assert_eq!(value["evaluation"]["kind"], "operation");
    assert_eq!(value["evaluation"]["op"], "-");
    assert_eq!(value["evaluation"]["left"]["kind"], "dynamic");
    assert_eq!(value["evaluation"]["right"]["value"], 1);

    // The snapshot of the inner evaluation matches the domain snapshot
    match &outputs[0] {
        CommandOutput::Count { evaluation, .. } => {
            let direct = serde_json::to_value(snapshot(evaluation)).unwrap();
            assert_eq!(value["evaluation"], direct);
        }
        other => panic!("expected count output, got {:?}", other),
    }
}

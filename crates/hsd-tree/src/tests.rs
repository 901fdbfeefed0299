use super::*;
use facet_testhelpers::test;
use hsd_parse::{MemoryResolver, NoIncludes, ParseCallback};

fn tree(source: &str) -> Element {
    parse_with(&Parser::new().with_resolver(NoIncludes), source).unwrap()
}

const DFTB_INPUT: &str = r#"Geometry = GenFormat {
2  S
Ga As
1    1    0.00000000000E+00   0.00000000000E+00   0.00000000000E+00
}
Test[unit=1,
    dim=3]{}
Hamiltonian = DFTB {
  SCC = Yes
  Mixer = Broyden {}
  MaxAngularMomentum {
    Ga = "d"
    As = "p"
  }
  Filling = Fermi {
    Temperature [Kelvin] = 1.0E-006
  }
}

Options {
  WriteHS = No
}"#;

#[test]
fn test_parse_empty() {
    let root = tree("");
    assert_eq!(root.name, "hsd");
    assert!(root.is_empty());
}

#[test]
fn test_top_level_tags_nest_under_root() {
    let root = tree(DFTB_INPUT);
    let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Geometry", "Test", "Hamiltonian", "Options"]);
}

#[test]
fn test_equals_form_wraps_block() {
    let root = tree(DFTB_INPUT);
    let geometry = root.child("Geometry").unwrap();
    assert!(geometry.has_equals_form);
    assert_eq!(geometry.text(), None);
    assert_eq!(geometry.children.len(), 1);

    let gen_format = geometry.child("GenFormat").unwrap();
    assert!(!gen_format.has_equals_form);
    assert_eq!(
        gen_format.text(),
        Some("2  S\nGa As\n1    1    0.00000000000E+00   0.00000000000E+00   0.00000000000E+00")
    );
}

#[test]
fn test_attributes_and_lines() {
    let root = tree(DFTB_INPUT);
    let test = root.child("Test").unwrap();
    assert_eq!(test.attribute("unit"), Some("1"));
    assert_eq!(test.attribute("dim"), Some("3"));
    assert_eq!(test.start_line, 6);

    let temperature = root.get("Hamiltonian.DFTB.Filling.Fermi.Temperature").unwrap();
    assert_eq!(temperature.attribute("default"), Some("Kelvin"));
    assert_eq!(temperature.text(), Some("1.0E-006"));
    assert_eq!(temperature.start_line, 15);
}

#[test]
fn test_quoted_values_keep_quotes() {
    let root = tree(DFTB_INPUT);
    let momentum = root.get("Hamiltonian.DFTB.MaxAngularMomentum").unwrap();
    assert_eq!(momentum.child("Ga").and_then(Element::text), Some("\"d\""));
    assert_eq!(momentum.child("As").and_then(Element::text), Some("\"p\""));
}

#[test]
fn test_text_runs_are_joined() {
    use hsd_parse::{Event, OpenFlags};

    let mut builder = TreeBuilder::new();
    for event in [
        Event::open("a", OpenFlags::block(0)),
        Event::text("1 2"),
        Event::open("b", OpenFlags::block(1)),
        Event::close("b"),
        Event::text("3 4"),
        Event::close("a"),
    ] {
        assert!(builder.event(event));
    }
    let root = builder.finish().unwrap();
    let a = root.child("a").unwrap();
    assert_eq!(a.text(), Some("1 2\n3 4"));
    assert_eq!(a.children.len(), 1);
}

#[test]
fn test_custom_root_name() {
    let mut builder = TreeBuilder::with_root("dftb_in");
    Parser::new()
        .with_resolver(NoIncludes)
        .feed("a = 1", &mut builder)
        .unwrap();
    let root = builder.finish().unwrap();
    assert_eq!(root.name, "dftb_in");
    assert_eq!(root.get("a").and_then(Element::text), Some("1"));
}

#[test]
fn test_structural_error() {
    let parser = Parser::new().with_resolver(NoIncludes);
    let err = parse_with(&parser, "a {\n  b = 1\n").unwrap_err();
    match err {
        BuildError::Structural(errors) => {
            assert_eq!(errors, vec![ParseError::new(ErrorCode::Tag, LineRange::new(0, 2))]);
        }
        other => panic!("expected structural error, got {other:?}"),
    }
}

#[test]
fn test_errors_from_included_documents_are_collected() {
    let resolver = MemoryResolver::new().with("broken.hsd", "x {");
    let parser = Parser::new().with_resolver(resolver);
    let err = parse_with(&parser, "<!broken.hsd\ny {}").unwrap_err();
    assert!(matches!(err, BuildError::Structural(ref errors) if errors.len() == 1));
    insta::assert_snapshot!(err.to_string(), @"unclosed tag (TAG_ERROR) at line 1");
}

#[test]
fn test_include_error() {
    let parser = Parser::new().with_resolver(MemoryResolver::new());
    let err = parse_with(&parser, "a = <<missing.txt").unwrap_err();
    assert!(matches!(err, BuildError::Include(_)));
    insta::assert_snapshot!(err.to_string(), @"included resource 'missing.txt' not found");
}

#[test]
fn test_includes_build_into_the_tree() {
    let resolver = MemoryResolver::new()
        .with("geo.gen", "2 S\nGa As\n")
        .with("options.hsd", "WriteHS = No\n");
    let parser = Parser::new().with_resolver(resolver);
    let root = parse_with(&parser, "Geometry = GenFormat {\n  <<geo.gen\n}\nOptions {\n  <!options.hsd\n}").unwrap();
    assert_eq!(
        root.get("Geometry.GenFormat").and_then(Element::text),
        Some("2 S\nGa As")
    );
    assert_eq!(root.get("Options.WriteHS").and_then(Element::text), Some("No"));
}

#[test]
fn test_unbalanced_events() {
    let mut builder = TreeBuilder::new();
    builder.event(hsd_parse::Event::close("a"));
    assert!(matches!(builder.finish(), Err(BuildError::Unbalanced)));

    let mut builder = TreeBuilder::new();
    builder.event(hsd_parse::Event::open("a", hsd_parse::OpenFlags::block(0)));
    assert!(matches!(builder.finish(), Err(BuildError::Unbalanced)));
}

/////////////////////////////TESTS////////////////////////////////////////////////////
/*
tests of the task document parser:
titles and keys
typed and quoted values
value lists
sections and whole documents
comments
malformed documents
*/

#[cfg(test)]
mod tests1 {

    use crate::Utils::task_parser::{
        Section, Value, filter_comments, parse_document, parse_key, parse_key_value_pair,
        parse_section, parse_task_document, parse_title, parse_value, parse_value_list,
    };

    #[test]
    fn test_parse_title() {
        // Basic title
        let (remaining, title) = parse_title("integral1\n expression: x").unwrap();
        assert_eq!(title, "integral1");
        assert_eq!(remaining, "expression: x");

        // Title with underscore
        let (remaining, title) = parse_title("integral_gauss lower: 0").unwrap();
        assert_eq!(title, "integral_gauss");
        assert_eq!(remaining, "lower: 0");

        assert!(parse_title("1integral").is_err());
    }

    #[test]
    fn test_parse_key() {
        let (remaining, key) = parse_key("max_depth: 50").unwrap();
        assert_eq!(key, "max_depth");
        assert_eq!(remaining, ": 50");

        let (remaining, key) = parse_key("_hidden2: x").unwrap();
        assert_eq!(key, "_hidden2");
        assert_eq!(remaining, ": x");
    }

    #[test]
    fn test_parse_value() {
        // String value
        let (remaining, value) = parse_value("simpson, next").unwrap();
        assert_eq!(value, Value::String("simpson".to_string()));
        assert_eq!(remaining, ", next");

        // Integer value
        let (remaining, value) = parse_value("50\n").unwrap();
        assert_eq!(value, Value::Integer(50));
        assert_eq!(remaining, "\n");

        // Float value
        let (_, value) = parse_value("1e-4").unwrap();
        assert_eq!(value, Value::Float(1e-4));

        // Boolean value
        let (_, value) = parse_value("true").unwrap();
        assert_eq!(value, Value::Boolean(true));

        // infinite bounds come out as floats
        let (_, value) = parse_value("-inf").unwrap();
        assert_eq!(value, Value::Float(f64::NEG_INFINITY));

        // an expression without spaces stays a string
        let (_, value) = parse_value("1/(1+x^2)").unwrap();
        assert_eq!(value, Value::String("1/(1+x^2)".to_string()));
    }

    #[test]
    fn test_parse_quoted_value() {
        let (remaining, value) = parse_value("\"3*x^2 + 2*x\"\n").unwrap();
        assert_eq!(value, Value::String("3*x^2 + 2*x".to_string()));
        assert_eq!(remaining, "\n");

        // quotes keep numbers as text and protect commas
        let (_, value) = parse_value("\"42\"").unwrap();
        assert_eq!(value, Value::String("42".to_string()));
        let (_, value) = parse_value("\"a, b\"").unwrap();
        assert_eq!(value, Value::String("a, b".to_string()));
    }

    #[test]
    fn test_parse_value_list() {
        let (remaining, values) = parse_value_list("x, 123, 45.67, true").unwrap();
        assert_eq!(
            values,
            vec![
                Value::String("x".to_string()),
                Value::Integer(123),
                Value::Float(45.67),
                Value::Boolean(true),
            ]
        );
        assert_eq!(remaining, "");

        let (_, values) = parse_value_list("\"sin(x) + 1\" , 2").unwrap();
        assert_eq!(
            values,
            vec![Value::String("sin(x) + 1".to_string()), Value::Integer(2)]
        );

        let (remaining, values) = parse_value_list("\nnext").unwrap();
        assert!(values.is_empty());
        assert_eq!(remaining, "\nnext");
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) =
            parse_key_value_pair("expression: \"exp(-x^2)\"\n  lower: -inf").unwrap();
        assert_eq!(key, "expression");
        assert_eq!(values, vec![Value::String("exp(-x^2)".to_string())]);
        assert_eq!(remaining, "lower: -inf");

        let (_, (key, values)) = parse_key_value_pair("tolerance :  1e-6").unwrap();
        assert_eq!(key, "tolerance");
        assert_eq!(values, vec![Value::Float(1e-6)]);
    }

    #[test]
    fn test_parse_section() {
        let input = "integral1\n  expression: x^2\n  lower: 0\n  upper: 1\nsettings\n  loglevel: info";
        let (remaining, section) = parse_section(input).unwrap();
        assert_eq!(section.title, "integral1");
        assert_eq!(section.entries.len(), 3);
        assert_eq!(section.first("expression"), Some(&Value::String("x^2".to_string())));
        assert_eq!(section.first("lower"), Some(&Value::Integer(0)));
        assert_eq!(section.first("upper"), Some(&Value::Integer(1)));
        assert_eq!(section.first("method"), None);
        assert_eq!(remaining, "settings\n  loglevel: info");
    }

    #[test]
    fn test_repeated_key_is_rejected() {
        let input = "integral1\n  lower: 0\n  upper: 1\n  lower: 2";
        match parse_section(input) {
            Err(nom::Err::Failure(e)) => assert_eq!(e.input, "lower: 2"),
            other => panic!("unexpected {:?}", other),
        }
        let err = parse_task_document("integral1\n  lower: 0\n  lower: 2\nsettings\n  parallel: true").unwrap_err();
        assert_eq!(err, "duplicate key at 'lower: 2'");
        // the same key in different sections is fine
        assert!(parse_task_document("a\n  lower: 0\nb\n  lower: 1").is_ok());
    }

    #[test]
    fn test_parse_document_keeps_order() {
        let input = "integral2\n expression: x\nintegral10\n expression: x^2\nintegral1\n expression: x^3";
        let (remaining, sections) = parse_document(input).unwrap();
        assert_eq!(remaining, "");
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["integral2", "integral10", "integral1"]);
    }

    #[test]
    fn test_filter_comments() {
        let input = "// header\nintegral\n# a comment\n  expression: x\n\n% other\n; last\n  lower: 0";
        assert_eq!(filter_comments(input), "integral\n  expression: x\n  lower: 0");
    }

    #[test]
    fn test_parse_task_document() {
        let input = r#"
// two integrals and settings
integral1
  expression: "3*x^2 + 2*x"
  variable: x
  lower: 0
  upper: 1

integral_gauss
  expression: "exp(-x^2)"
  lower: -inf
  upper: inf
  tolerance: 1e-4
  method: gauss

settings
  loglevel: warn
  parallel: false
"#;
        let sections = parse_task_document(input).unwrap();
        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections[0],
            Section {
                title: "integral1".to_string(),
                entries: [
                    ("expression".to_string(), vec![Value::String("3*x^2 + 2*x".to_string())]),
                    ("variable".to_string(), vec![Value::String("x".to_string())]),
                    ("lower".to_string(), vec![Value::Integer(0)]),
                    ("upper".to_string(), vec![Value::Integer(1)]),
                ]
                .into_iter()
                .collect(),
            }
        );
        assert_eq!(sections[1].first("upper"), Some(&Value::Float(f64::INFINITY)));
        assert_eq!(sections[1].first("tolerance").and_then(|v| v.as_float()), Some(1e-4));
        assert_eq!(sections[2].first("parallel").and_then(|v| v.as_boolean()), Some(false));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_task_document("").is_err());
        assert!(parse_task_document("// only a comment").is_err());
        // a title without pairs
        assert!(parse_task_document("integral").is_err());
        // garbage after a valid section
        let err = parse_task_document("integral\n expression: x\n 42 things").unwrap_err();
        assert!(err.contains("Remaining"), "{}", err);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::Integer(3).as_integer(), Some(3));
        assert_eq!(Value::Float(0.5).as_integer(), None);
        assert_eq!(Value::String("x".to_string()).as_string().map(|s| s.as_str()), Some("x"));
        assert_eq!(Value::Boolean(true).as_string(), None);
        assert_eq!(Value::Float(2.5).to_string_value(), "2.5");
        assert_eq!(Value::Integer(-1).to_string(), "-1");
    }
}

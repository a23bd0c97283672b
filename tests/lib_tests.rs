use super_grep::engine::{
    OutputStyle, display_path, format_record, glob_match, should_include_in_walk,
};
use super_grep::{Matcher, ResultRecord, tokenize};
use std::path::{Path, PathBuf};

// --- glob_match / should_include_in_walk ---

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("node_modules", "node_modules"));
    assert!(!glob_match("node_modules", "node_module"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.log", "foo.log"));
    assert!(glob_match("*.log", ".log"));
    assert!(!glob_match("*.log", "foo.log.txt"));
    assert!(glob_match("node_*", "node_modules"));
}

#[test]
fn test_glob_match_bang_not_negation() {
    assert!(!glob_match("!node_modules", "node_modules"));
}

#[test]
fn test_should_include_root_kept() {
    let root = PathBuf::from("/foo");
    assert!(should_include_in_walk(&root, &root, &[]));
}

#[test]
fn test_should_include_exclude_pattern_name() {
    let root = PathBuf::from("/foo");
    assert!(!should_include_in_walk(
        Path::new("/foo/target"),
        &root,
        &["target".to_string()]
    ));
}

#[test]
fn test_should_include_exclude_pattern_full_path() {
    let root = PathBuf::from("/foo");
    assert!(!should_include_in_walk(
        Path::new("/foo/build/out.bin"),
        &root,
        &["/foo/build/*".to_string()]
    ));
}

#[test]
fn test_should_include_not_excluded() {
    let root = PathBuf::from("/foo");
    assert!(should_include_in_walk(
        Path::new("/foo/src/main.rs"),
        &root,
        &["*.log".to_string()]
    ));
}

// --- tokenizer / matcher through the public API ---

#[test]
fn test_tokenize_public() {
    let words: Vec<String> = tokenize("getValueFromSection")
        .iter()
        .map(|t| t.as_str().to_string())
        .collect();
    assert_eq!(words, vec!["get", "Value", "From", "Section"]);
}

#[test]
fn test_matcher_convention_invariance() {
    let spellings = ["foo-bar", "foo_bar", "foo bar", "FooBar", "Foo-Bar", "fooBar"];
    for term in spellings {
        let m = Matcher::from_term(term).unwrap();
        for text in spellings {
            assert!(m.is_match(text), "{term:?} should match {text:?}");
        }
    }
}

#[test]
fn test_matcher_does_not_match_unrelated() {
    let m = Matcher::from_term("periodicTable").unwrap();
    assert!(m.is_match("PERIODIC__TABLE"));
    assert!(!m.is_match("periodic.table"));
    assert!(!m.is_match("periodictab"));
}

// --- output formatting ---

#[test]
fn test_format_content_match_plain() {
    let r = ResultRecord::ContentMatch {
        path: PathBuf::from("src/app.py"),
        line_number: 3,
        line_text: "def get_value_from_section():".into(),
    };
    assert_eq!(
        format_record(&r, &OutputStyle::default()),
        "src/app.py:3:def get_value_from_section():"
    );
}

#[test]
fn test_format_hide_path() {
    let style = OutputStyle {
        colorize: false,
        hide_path: true,
    };
    let r = ResultRecord::FilenameMatch {
        path: PathBuf::from("deep/dir/getValue.py"),
    };
    assert_eq!(format_record(&r, &style), "getValue.py");
    assert_eq!(display_path(Path::new("deep/dir/x.txt"), false), "deep/dir/x.txt");
}

#[test]
fn test_format_matched_file_only_is_bare_path() {
    let style = OutputStyle {
        colorize: true,
        hide_path: false,
    };
    let r = ResultRecord::MatchedFileOnly {
        path: PathBuf::from("a/b.txt"),
    };
    assert_eq!(format_record(&r, &style), "a/b.txt");
}

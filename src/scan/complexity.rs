//! Cyclomatic complexity from tree-sitter syntax trees.
//!
//! Each function body counts as one unit: 1 plus the decision nodes inside
//! it. Closures and callbacks fold into the function that contains them. A
//! file's value is the rounded average over its units, so long files are not
//! penalised for having many simple functions.

use super::filesystem::absolute;
use crate::types::facts::FileComplexity;
use std::path::Path;
use tree_sitter::{Language, Node, Parser};

const MAX_FILE_BYTES: u64 = 512 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    Java,
}

impl Grammar {
    pub fn for_path(path: &str) -> Option<Self> {
        let file = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "rs" => Some(Self::Rust),
            "py" => Some(Self::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }

    fn function_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Rust => &["function_item"],
            Self::Python => &["function_definition"],
            Self::JavaScript | Self::TypeScript | Self::Tsx => &[
                "function_declaration",
                "generator_function_declaration",
                "method_definition",
            ],
            Self::Go => &["function_declaration", "method_declaration"],
            Self::Java => &["method_declaration", "constructor_declaration"],
        }
    }

    fn decision_kinds(self) -> &'static [&'static str] {
        match self {
            Self::Rust => &[
                "if_expression",
                "while_expression",
                "for_expression",
                "match_arm",
            ],
            Self::Python => &[
                "if_statement",
                "elif_clause",
                "while_statement",
                "for_statement",
                "except_clause",
                "conditional_expression",
                "boolean_operator",
                "if_clause",
                "case_clause",
            ],
            Self::JavaScript | Self::TypeScript | Self::Tsx => &[
                "if_statement",
                "while_statement",
                "for_statement",
                "for_in_statement",
                "do_statement",
                "switch_case",
                "catch_clause",
                "ternary_expression",
            ],
            Self::Go => &[
                "if_statement",
                "for_statement",
                "expression_case",
                "type_case",
                "communication_case",
            ],
            Self::Java => &[
                "if_statement",
                "while_statement",
                "for_statement",
                "enhanced_for_statement",
                "do_statement",
                "catch_clause",
                "switch_block_statement_group",
                "switch_rule",
                "ternary_expression",
            ],
        }
    }

    /// Whether `node` opens a new unit. Function values bound to a name
    /// (`const load = () => ...`) count as functions, anonymous callbacks
    /// do not.
    fn is_function(self, node: &Node, parent: &Node) -> bool {
        let kind = node.kind();
        if self.function_kinds().contains(&kind) {
            return true;
        }
        matches!(self, Self::JavaScript | Self::TypeScript | Self::Tsx)
            && matches!(kind, "arrow_function" | "function_expression")
            && parent.kind() == "variable_declarator"
    }

    fn decisions_at(self, node: &Node) -> u32 {
        let kind = node.kind();
        if self.decision_kinds().contains(&kind) {
            return 1;
        }
        if kind == "binary_expression" {
            let mut cursor = node.walk();
            return node
                .children(&mut cursor)
                .filter(|child| matches!(child.kind(), "&&" | "||" | "??"))
                .count() as u32;
        }
        0
    }
}

/// Decisions under `node`, excluding nested functions, which are pushed
/// onto `units` as complete measurements instead.
fn tally(node: &Node, grammar: Grammar, units: &mut Vec<u32>) -> u32 {
    let mut decisions = grammar.decisions_at(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if grammar.is_function(&child, node) {
            let inner = tally(&child, grammar, units);
            units.push(1 + inner);
        } else {
            decisions += tally(&child, grammar, units);
        }
    }
    decisions
}

/// Average cyclomatic complexity per function in `content`, at least 1.
/// `None` when the grammar cannot be loaded or the parser gives up.
pub fn measure(grammar: Grammar, content: &str) -> Option<u32> {
    let mut parser = Parser::new();
    parser.set_language(&grammar.language()).ok()?;
    let tree = parser.parse(content, None)?;

    let mut units = Vec::new();
    let top_level = tally(&tree.root_node(), grammar, &mut units);
    if units.is_empty() || top_level > 0 {
        units.push(1 + top_level);
    }
    let count = units.len() as u32;
    let total: u32 = units.iter().sum();
    Some((total + count / 2) / count)
}

pub fn measure_files(root: &Path, files: &[String]) -> Vec<FileComplexity> {
    files
        .iter()
        .filter_map(|path| {
            let grammar = Grammar::for_path(path)?;
            let full = absolute(root, path);
            let size = std::fs::metadata(&full).ok()?.len();
            if size == 0 || size > MAX_FILE_BYTES {
                return None;
            }
            let content = std::fs::read_to_string(&full).ok()?;
            let cyclomatic = measure(grammar, &content)?;
            Some(FileComplexity {
                path: path.clone(),
                cyclomatic,
            })
        })
        .collect()
}

pub fn average(measurements: &[FileComplexity]) -> Option<f64> {
    if measurements.is_empty() {
        return None;
    }
    let total: u64 = measurements
        .iter()
        .map(|file| u64::from(file.cyclomatic))
        .sum();
    Some(total as f64 / measurements.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rust(source: &str) -> u32 {
        measure(Grammar::Rust, source).expect("rust source should parse")
    }

    #[test]
    fn straight_line_code_has_complexity_one() {
        assert_eq!(rust("fn main() {\n    println!(\"hi\");\n}\n"), 1);
        assert_eq!(rust(""), 1);
    }

    #[test]
    fn match_arms_and_short_circuits_are_decisions() {
        let source = r#"
fn classify(code: u32, strict: bool, verbose: bool) -> &'static str {
    if strict && code > 10 {
        return "strict";
    }
    if verbose || code == 0 {
        return "verbose";
    }
    match code {
        1 => "one",
        2 => "two",
        3 => "three",
        4 => "four",
        5 => "five",
        6 => "six",
        _ => "other",
    }
}
"#;
        let value = rust(source);
        assert!(value >= 8, "got {value}");
        assert_eq!(value, 12);
    }

    #[test]
    fn match_arms_do_not_count_as_functions() {
        let source = r#"
fn plain() -> u32 {
    1
}

fn pick(x: u8) -> u8 {
    match x {
        0 => 1,
        1 => 2,
        _ => 3,
    }
}
"#;
        assert_eq!(rust(source), 3);
    }

    #[test]
    fn branches_and_operators_add_paths() {
        let source = r#"
function check(a, b) {
    if (a && b) {
        return 1;
    }
    for (const x of a) {
        while (x || b) { break; }
    }
    // if this were counted it would be wrong
    return 0;
}
"#;
        assert_eq!(measure(Grammar::JavaScript, source), Some(6));
    }

    #[test]
    fn callbacks_count_toward_enclosing_function() {
        let source = r#"
function load(items) {
    if (!items) {
        return [];
    }
    return items.map((item) => item ? item.id : null);
}
"#;
        assert_eq!(measure(Grammar::JavaScript, source), Some(3));
    }

    #[test]
    fn named_arrow_functions_are_their_own_unit() {
        let source = "const pick = (x) => x ? 1 : 2;\nfunction plain() { return 0; }\n";
        assert_eq!(measure(Grammar::TypeScript, source), Some(2));
    }

    #[test]
    fn go_switch_cases_are_counted() {
        let source = r#"
package main

func describe(n int) string {
	switch n {
	case 1:
		return "one"
	case 2:
		return "two"
	default:
		return "many"
	}
}
"#;
        assert_eq!(measure(Grammar::Go, source), Some(3));
    }

    #[test]
    fn complexity_is_averaged_per_function() {
        let source = "def a(x):\n    if x:\n        return 1\n\ndef b(y):\n    if y:\n        return 2\n";
        assert_eq!(measure(Grammar::Python, source), Some(2));
    }

    #[test]
    fn module_level_branches_form_a_unit() {
        let source = "import sys\n\nif len(sys.argv) > 1:\n    print(sys.argv[1])\n";
        assert_eq!(measure(Grammar::Python, source), Some(2));
    }

    #[test]
    fn grammar_follows_extension() {
        assert_eq!(Grammar::for_path("src/lib.rs"), Some(Grammar::Rust));
        assert_eq!(Grammar::for_path("web/App.TSX"), Some(Grammar::Tsx));
        assert_eq!(Grammar::for_path("index.cjs"), Some(Grammar::JavaScript));
        assert_eq!(Grammar::for_path("Main.kt"), None);
        assert_eq!(Grammar::for_path("Makefile"), None);
    }

    #[test]
    fn measure_files_skips_unsupported_files() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(dir.path().join("main.py"), "def run(x):\n    if x:\n        pass\n")
            .expect("source should write");
        fs::write(dir.path().join("notes.md"), "if and while").expect("notes should write");
        fs::write(dir.path().join("App.kt"), "fun main() { if (x) {} }")
            .expect("kotlin should write");
        let files = vec![
            "main.py".to_string(),
            "notes.md".to_string(),
            "App.kt".to_string(),
        ];

        let measured = measure_files(dir.path(), &files);
        assert_eq!(measured.len(), 1);
        assert_eq!(measured[0].cyclomatic, 2);
        assert_eq!(average(&measured), Some(2.0));
    }

    #[test]
    fn average_of_nothing_is_none() {
        assert_eq!(average(&[]), None);
    }
}

//! Command handling for the interactive shell.
//!
//! A [`Session`] owns the loaded records and turns one input line into one
//! block of output. Errors are rendered as `ERR <message>` and never end the
//! session.

use anyhow::{anyhow, bail, Context, Result};
use config::ShellConfig;
use keysort::{Direction, MissingPolicy, NamedTransform, SortSpec};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const SORT_USAGE: &str = "usage: SORT key [asc|desc] [last|first|raise] [transform]";

/// Result of executing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Exit(String),
}

/// The people list used by `DEMO`; one record has no `age`.
pub fn demo_records() -> Vec<Value> {
    vec![
        json!({"name": "Alice", "age": 30}),
        json!({"name": "bob", "age": 25}),
        json!({"name": "Charlie"}),
        json!({"name": "dan", "age": 35}),
    ]
}

#[derive(Debug)]
pub struct Session {
    records: Vec<Value>,
    config: ShellConfig,
}

impl Session {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            records: Vec::new(),
            config,
        }
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn execute(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            return Outcome::Continue(String::new());
        }
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let result = match cmd.to_uppercase().as_str() {
            "ADD" => self.add(rest),
            "LOAD" => self.load(rest),
            "DEMO" => {
                self.records = demo_records();
                Ok(format!("OK ({} records)", self.records.len()))
            }
            "SHOW" => self.render(self.records.iter()),
            "SORT" => self.sort(rest),
            "COUNT" => Ok(self.records.len().to_string()),
            "CLEAR" => {
                self.records.clear();
                Ok("OK".to_string())
            }
            "EXIT" | "QUIT" => return Outcome::Exit("bye".to_string()),
            other => Ok(format!("unknown command: {other}")),
        };

        match result {
            Ok(out) => Outcome::Continue(out),
            Err(e) => Outcome::Continue(format!("ERR {e:#}")),
        }
    }

    fn add(&mut self, rest: &str) -> Result<String> {
        if rest.is_empty() {
            bail!("usage: ADD {{json object}}");
        }
        let value: Value = serde_json::from_str(rest).context("invalid JSON")?;
        if !value.is_object() {
            bail!("expected a JSON object");
        }
        self.records.push(value);
        Ok("OK".to_string())
    }

    fn load(&mut self, rest: &str) -> Result<String> {
        if rest.is_empty() {
            bail!("usage: LOAD path");
        }
        let loaded = load_records(Path::new(rest))?;
        let n = loaded.len();
        self.records.extend(loaded);
        info!(path = rest, records = n, "loaded records");
        Ok(format!("OK ({n} records)"))
    }

    fn sort(&self, rest: &str) -> Result<String> {
        let (spec, transform) = self.parse_sort(rest)?;
        debug!(path = %spec.path(), %transform, "sort command");
        let sorted = transform.sort(&self.records, &spec)?;
        self.render(sorted.into_iter())
    }

    /// Parses `key [options...]`. Options may come in any order and override
    /// the configured defaults.
    fn parse_sort(&self, rest: &str) -> Result<(SortSpec, NamedTransform)> {
        let mut parts = rest.split_whitespace();
        let key = parts.next().ok_or_else(|| anyhow!(SORT_USAGE))?;

        let mut direction = self.config.direction;
        let mut missing = self.config.missing;
        let mut transform = self.config.transform;
        for opt in parts {
            if let Ok(d) = opt.parse::<Direction>() {
                direction = d;
            } else if let Ok(m) = opt.parse::<MissingPolicy>() {
                missing = m;
            } else if let Ok(t) = opt.parse::<NamedTransform>() {
                transform = t;
            } else {
                bail!("unrecognised SORT option {opt:?}; {SORT_USAGE}");
            }
        }

        let spec = SortSpec::new(key)
            .with_direction(direction)
            .with_missing(missing);
        Ok((spec, transform))
    }

    fn render<'a, I>(&self, records: I) -> Result<String>
    where
        I: Iterator<Item = &'a Value>,
    {
        let mut lines = Vec::new();
        for record in records {
            let line = if self.config.pretty {
                serde_json::to_string_pretty(record)?
            } else {
                serde_json::to_string(record)?
            };
            lines.push(line);
        }
        if lines.is_empty() {
            return Ok("(empty)".to_string());
        }
        let n = lines.len();
        lines.push(format!("({n} records)"));
        Ok(lines.join("\n"))
    }
}

/// Reads a file holding either a JSON array of objects or a single object.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    match value {
        Value::Array(items) => {
            if let Some(i) = items.iter().position(|v| !v.is_object()) {
                bail!("{}: element {i} is not a JSON object", path.display());
            }
            Ok(items)
        }
        obj @ Value::Object(_) => Ok(vec![obj]),
        _ => bail!("{}: expected a JSON array of objects", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn demo_session() -> Session {
        let mut s = Session::new(ShellConfig::default());
        s.execute("DEMO");
        s
    }

    fn output(outcome: Outcome) -> String {
        match outcome {
            Outcome::Continue(out) => out,
            Outcome::Exit(out) => panic!("unexpected exit: {out}"),
        }
    }

    fn sorted_names(out: &str) -> Vec<String> {
        out.lines()
            .filter_map(|l| serde_json::from_str::<Value>(l).ok())
            .map(|v| v["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn sort_demo_by_age() {
        let mut s = demo_session();
        let out = output(s.execute("SORT age"));
        assert_eq!(sorted_names(&out), ["bob", "Alice", "dan", "Charlie"]);
        assert!(out.ends_with("(4 records)"));
    }

    #[test]
    fn sort_demo_missing_first_desc() {
        let mut s = demo_session();
        let out = output(s.execute("sort age first desc"));
        assert_eq!(sorted_names(&out), ["Charlie", "dan", "Alice", "bob"]);
    }

    #[test]
    fn sort_demo_case_insensitive() {
        let mut s = demo_session();
        let out = output(s.execute("SORT name lowercase"));
        assert_eq!(sorted_names(&out), ["Alice", "bob", "Charlie", "dan"]);
    }

    #[test]
    fn sort_raise_reports_segment() {
        let mut s = demo_session();
        let out = output(s.execute("SORT age raise"));
        assert!(out.starts_with("ERR "), "{out}");
        assert!(out.contains("\"age\""), "{out}");
    }

    #[test]
    fn sort_rejects_unknown_option() {
        let mut s = demo_session();
        let out = output(s.execute("SORT age middle"));
        assert!(out.starts_with("ERR unrecognised SORT option"), "{out}");
    }

    #[test]
    fn sort_does_not_reorder_session() {
        let mut s = demo_session();
        s.execute("SORT age desc");
        assert_eq!(s.records(), demo_records().as_slice());
    }

    #[test]
    fn config_defaults_apply() {
        let config = ShellConfig {
            direction: Direction::Descending,
            missing: MissingPolicy::First,
            ..ShellConfig::default()
        };
        let mut s = Session::new(config);
        s.execute("DEMO");
        let out = output(s.execute("SORT age"));
        assert_eq!(sorted_names(&out), ["Charlie", "dan", "Alice", "bob"]);
        let out = output(s.execute("SORT age asc last"));
        assert_eq!(sorted_names(&out), ["bob", "Alice", "dan", "Charlie"]);
    }

    #[test]
    fn add_and_count() {
        let mut s = Session::new(ShellConfig::default());
        assert_eq!(output(s.execute(r#"ADD {"name": "x", "address": {"city": "Oslo"}}"#)), "OK");
        assert_eq!(output(s.execute(r#"ADD {"name": "y", "address": {"city": "Alta"}}"#)), "OK");
        assert_eq!(output(s.execute("COUNT")), "2");
        let out = output(s.execute("SORT address.city"));
        assert_eq!(sorted_names(&out), ["y", "x"]);
    }

    #[test]
    fn add_rejects_non_objects() {
        let mut s = Session::new(ShellConfig::default());
        assert!(output(s.execute("ADD [1, 2]")).starts_with("ERR"));
        assert!(output(s.execute("ADD {nope")).starts_with("ERR invalid JSON"));
        assert!(output(s.execute("ADD")).starts_with("ERR usage"));
        assert_eq!(output(s.execute("COUNT")), "0");
    }

    #[test]
    fn show_and_clear() {
        let mut s = demo_session();
        assert!(output(s.execute("SHOW")).contains("Charlie"));
        assert_eq!(output(s.execute("CLEAR")), "OK");
        assert_eq!(output(s.execute("SHOW")), "(empty)");
    }

    #[test]
    fn load_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.json");
        let mut f = fs::File::create(&path).unwrap();
        write!(f, r#"[{{"name": "b", "k": 2}}, {{"name": "a", "k": 1}}]"#).unwrap();
        drop(f);

        let mut s = Session::new(ShellConfig::default());
        let out = output(s.execute(&format!("LOAD {}", path.display())));
        assert_eq!(out, "OK (2 records)");
        assert_eq!(sorted_names(&output(s.execute("SORT k"))), ["a", "b"]);
    }

    #[test]
    fn load_rejects_scalars_in_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[{\"a\": 1}, 3]").unwrap();
        let err = load_records(&path).unwrap_err();
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn load_missing_file_is_error() {
        let mut s = Session::new(ShellConfig::default());
        let out = output(s.execute("LOAD /definitely/not/here.json"));
        assert!(out.starts_with("ERR failed to read"), "{out}");
    }

    #[test]
    fn exit_and_unknown() {
        let mut s = Session::new(ShellConfig::default());
        assert_eq!(output(s.execute("FROB")), "unknown command: FROB");
        assert_eq!(output(s.execute("   ")), "");
        assert_eq!(s.execute("quit"), Outcome::Exit("bye".to_string()));
    }
}

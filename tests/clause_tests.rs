use std::io;

use stata_preproc::backend::{resolve_macro, with_selection, SelVar, StataBackend};
use stata_preproc::parser::{parse_clauses, resolve_range};

/// Records every backend call so tests can assert on the traffic.
#[derive(Default)]
struct MockBackend {
    observations: u64,
    count_calls: usize,
    scratch_calls: Vec<String>,
    drop_calls: Vec<String>,
    locals: Vec<(String, String)>,
    globals: Vec<(String, String)>,
}

impl MockBackend {
    fn with_observations(observations: u64) -> Self {
        Self {
            observations,
            ..Default::default()
        }
    }
}

impl StataBackend for MockBackend {
    fn run(&mut self, _cmd: &str, _quietly: bool) -> io::Result<(String, i32)> {
        Ok((String::new(), 0))
    }

    fn count(&mut self) -> io::Result<u64> {
        self.count_calls += 1;
        Ok(self.observations)
    }

    fn scratch_indicator(&mut self, condition: &str) -> io::Result<String> {
        self.scratch_calls.push(condition.to_string());
        Ok(format!("__sel{}", self.scratch_calls.len()))
    }

    fn drop_var(&mut self, name: &str) -> io::Result<()> {
        self.drop_calls.push(name.to_string());
        Ok(())
    }

    fn local_macro(&mut self, name: &str) -> io::Result<String> {
        Ok(self
            .locals
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default())
    }

    fn global_macro(&mut self, name: &str) -> io::Result<String> {
        Ok(self
            .globals
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default())
    }
}

mod clause_parsing {
    use super::*;

    #[test]
    fn code_if_in_all_present() {
        let parsed = parse_clauses("summarize x if y>0 in 1/10");
        assert_eq!(parsed.code, "summarize x");
        assert_eq!(parsed.condition, "if y>0");
        assert_eq!(parsed.range, "in 1/10");
    }

    #[test]
    fn plain_code_has_empty_clauses() {
        let parsed = parse_clauses("regress y x1 x2");
        assert_eq!(parsed.code, "regress y x1 x2");
        assert_eq!(parsed.condition, "");
        assert_eq!(parsed.range, "");
    }

    #[test]
    fn leading_if_leaves_code_empty() {
        let parsed = parse_clauses("if x>0 in 2/5");
        assert_eq!(parsed.code, "");
        assert_eq!(parsed.condition, "if x>0");
        assert_eq!(parsed.range, "in 2/5");
    }

    #[test]
    fn range_without_condition() {
        let parsed = parse_clauses("list make in 1/5");
        assert_eq!(parsed.code, "list make");
        assert_eq!(parsed.condition, "");
        assert_eq!(parsed.range, "in 1/5");
    }

    #[test]
    fn identifiers_containing_keywords_do_not_split() {
        let parsed = parse_clauses("insheet using data.csv");
        assert_eq!(parsed.code, "insheet using data.csv");
        assert_eq!(parsed.condition, "");

        let parsed = parse_clauses("di if_total");
        assert_eq!(parsed.code, "di if_total");
        assert_eq!(parsed.condition, "");
    }

    #[test]
    fn out_of_order_clauses_are_a_parse_miss() {
        let parsed = parse_clauses("sum x in 1/5 if y>0");
        assert_eq!(parsed.code, "sum x in 1/5 if y>0");
        assert_eq!(parsed.condition, "");
        assert_eq!(parsed.range, "");
    }

    #[test]
    fn trailing_bare_if_belongs_to_code() {
        // `if` with nothing after it is not a clause.
        let parsed = parse_clauses("di x if");
        assert_eq!(parsed.code, "di x if");
        assert_eq!(parsed.condition, "");
    }

    #[test]
    fn condition_may_span_newlines() {
        let parsed = parse_clauses("sum x if y>0 &\nz<2");
        assert_eq!(parsed.code, "sum x");
        assert_eq!(parsed.condition, "if y>0 &\nz<2");
    }
}

mod range_resolution {
    use super::*;

    #[test]
    fn explicit_bounds_are_zero_based_on_the_left() {
        let mut backend = MockBackend::with_observations(50);
        let range = resolve_range("in 3/7", &mut backend).unwrap();
        assert_eq!(range, (Some(2), Some(7)));
        assert_eq!(backend.count_calls, 0, "no backend call without `l`");
    }

    #[test]
    fn first_shorthand_resolves_to_zero() {
        let mut backend = MockBackend::with_observations(50);
        assert_eq!(
            resolve_range("in f/10", &mut backend).unwrap(),
            (Some(0), Some(10))
        );
    }

    #[test]
    fn last_shorthand_queries_the_backend() {
        let mut backend = MockBackend::with_observations(50);
        assert_eq!(
            resolve_range("in 1/l", &mut backend).unwrap(),
            (Some(0), Some(50))
        );
        assert_eq!(backend.count_calls, 1);
    }

    #[test]
    fn clause_without_slash_means_no_restriction() {
        let mut backend = MockBackend::with_observations(50);
        assert_eq!(resolve_range("in 5", &mut backend).unwrap(), (None, None));
        assert_eq!(resolve_range("", &mut backend).unwrap(), (None, None));
    }

    #[test]
    fn garbage_bounds_are_an_error() {
        let mut backend = MockBackend::with_observations(50);
        assert!(resolve_range("in a/b", &mut backend).is_err());
    }
}

mod selection_variable {
    use super::*;

    #[test]
    fn condition_is_materialized_without_the_if_keyword() {
        let mut backend = MockBackend::with_observations(10);
        let sel = SelVar::create("if x>0", &mut backend).unwrap();
        assert_eq!(sel.varname(), Some("__sel1"));
        assert_eq!(backend.scratch_calls, vec!["x>0".to_string()]);
    }

    #[test]
    fn empty_condition_allocates_nothing() {
        let mut backend = MockBackend::with_observations(10);
        let mut sel = SelVar::create("", &mut backend).unwrap();
        assert_eq!(sel.varname(), None);

        sel.release(&mut backend);
        assert!(backend.drop_calls.is_empty());
    }

    #[test]
    fn release_is_idempotent() {
        let mut backend = MockBackend::with_observations(10);
        let mut sel = SelVar::create("if x>0", &mut backend).unwrap();

        sel.release(&mut backend);
        sel.release(&mut backend);
        assert_eq!(backend.drop_calls, vec!["__sel1".to_string()]);
        assert_eq!(sel.varname(), None);
    }

    #[test]
    fn scoped_selection_releases_on_the_error_path() {
        let mut backend = MockBackend::with_observations(10);
        let result: io::Result<()> = with_selection(&mut backend, "if x>0", |_, varname| {
            assert_eq!(varname, Some("__sel1"));
            Err(io::Error::other("backend blew up"))
        });

        assert!(result.is_err());
        assert_eq!(backend.drop_calls, vec!["__sel1".to_string()]);
    }
}

mod macros {
    use super::*;

    #[test]
    fn local_global_and_literal_tokens() {
        let mut backend = MockBackend {
            locals: vec![("x".into(), "42".into())],
            globals: vec![("g".into(), "7".into())],
            ..Default::default()
        };

        assert_eq!(resolve_macro(&mut backend, "`x'").unwrap(), "42");
        assert_eq!(resolve_macro(&mut backend, "$_x").unwrap(), "42");
        assert_eq!(resolve_macro(&mut backend, "$g").unwrap(), "7");
        assert_eq!(resolve_macro(&mut backend, "plain").unwrap(), "plain");
    }
}

use std::collections::{BTreeMap, HashMap};

use proptest::prelude::*;

use cmdchain::model::CommandDefinition;
use cmdchain::resolve::{self, NoHistory, ResolveContext};
use cmdchain_test_utils::builders::{ArgumentBuilder, CommandBuilder};

proptest! {
    // quote() must be reversible by the shell's own reading of a
    // single-quoted word: strip the outer quotes, undo the '\'' escape.
    #[test]
    fn quoting_survives_a_shell_style_unquote(value in any::<String>()) {
        let quoted = resolve::quote(&value);
        prop_assert!(quoted.starts_with('\''));
        prop_assert!(quoted.ends_with('\''));
        let interior = &quoted[1..quoted.len() - 1];
        prop_assert_eq!(interior.replace(r"'\''", "'"), value);
    }

    // Disabled arguments are skipped wholesale. Enabled names and values are
    // drawn from [a-m] only, so the zz marker can come from nowhere but a
    // disabled value leaking through.
    #[test]
    fn disabled_arguments_never_reach_the_command_line(
        specs in proptest::collection::vec(
            ("[a-m]{0,6}", "[a-m]{0,8}", any::<bool>(), any::<bool>()),
            0..8,
        ),
    ) {
        let mut builder = CommandBuilder::new("cmd", "run");
        for (name, value, enabled, positional) in &specs {
            let mut arg = ArgumentBuilder::flag(name).value(value);
            if !enabled {
                arg = arg.value(&format!("zz{value}zz")).disabled();
            }
            if *positional {
                arg = arg.positional();
            }
            builder = builder.argument(arg.build());
        }
        let def = builder.build();

        let lookup: HashMap<String, CommandDefinition> = HashMap::new();
        let variables = BTreeMap::new();
        let inv = resolve::resolve(
            &def,
            &ResolveContext {
                lookup: &lookup,
                variables: &variables,
                history: &NoHistory,
            },
        )
        .unwrap();

        prop_assert!(!inv.command_line.contains("zz"));
        prop_assert!(inv.command_line.starts_with("run"));
        let enabled = specs.iter().filter(|(_, _, enabled, _)| *enabled).count();
        prop_assert!(inv.tokens.len() <= enabled * 2);
    }

    // Extracting with an escaped literal pattern is exactly substring search,
    // and the value handed back is the literal itself.
    #[test]
    fn escaped_literals_extract_exactly_when_present(
        needle in "[a-z]{1,6}",
        haystack in "[a-z \n]{0,40}",
    ) {
        let got = resolve::extract(&regex::escape(&needle), &haystack).unwrap();
        prop_assert_eq!(got.is_some(), haystack.contains(&needle));
        if let Some(found) = got {
            prop_assert_eq!(found, needle);
        }
    }
}

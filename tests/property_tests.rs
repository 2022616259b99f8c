//! Property-based tests for descriptor decoding, filtering and augmentation.

use proptest::prelude::*;
use speedup_analysis::prelude::*;
use std::collections::BTreeSet;

fn param_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{0,6}( [a-z]{1,3})?"
}

fn parameters() -> impl Strategy<Value = Parameters> {
    prop::collection::btree_map(param_name(), -1_000i64..1_000, 1..6)
        .prop_map(|m| m.into_iter().map(|(k, v)| (k, v as f64)).collect())
}

fn table() -> impl Strategy<Value = ObservationTable> {
    let row = (
        prop::sample::select(vec!["Serial", "Classic", "Latency Hiding"]),
        1u32..64,
        prop::sample::select(vec![0u32, 10, 50, 100]),
        0.0f64..1.0e9,
    );
    prop::collection::vec(row, 0..40).prop_map(|rows| {
        rows.into_iter()
            .map(|(scheduler, cores, latency, wallclock)| {
                let params = [
                    ("Cores".to_string(), cores as f64),
                    ("Latency ms".to_string(), latency as f64),
                ]
                .into_iter()
                .collect();
                Observation::new(scheduler, params, wallclock)
            })
            .collect()
    })
}

fn condition() -> impl Strategy<Value = Condition> {
    let leaf = prop_oneof![
        (1u32..64).prop_map(|c| Condition::param_gt("Cores", c as f64)),
        prop::sample::select(vec![0u32, 10, 50]).prop_map(|l| Condition::param_eq("Latency ms", l as f64)),
        prop::sample::select(vec!["Serial", "Classic"]).prop_map(Condition::scheduler_is),
    ];
    leaf.prop_recursive(3, 8, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.or(b)),
            inner.prop_map(Condition::negate),
        ]
    })
}

proptest! {
    #[test]
    fn decode_inverts_encode(params in parameters()) {
        for format in [
            DescriptorFormat::integer(),
            DescriptorFormat::float(),
            DescriptorFormat::integer().with_separator('-'),
        ] {
            let descriptor = format.encode(&params);
            prop_assert_eq!(format.decode(&descriptor).unwrap(), params.clone());
        }
    }

    #[test]
    fn decoded_names_are_trimmed(name in param_name(), value in -100i64..100, pad in " {0,3}") {
        let descriptor = format!("{pad}{name}{pad}:{pad}{value}{pad}");
        let params = DescriptorFormat::integer().decode(&descriptor).unwrap();
        prop_assert_eq!(params.get(name.as_str()).copied(), Some(value as f64));
    }

    #[test]
    fn filtering_is_idempotent(table in table(), when in condition()) {
        let filter = ObservationFilter::new().exclude(when);
        let once = filter.apply(&table).unwrap();
        let twice = filter.apply(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filtering_keeps_input_order(table in table(), when in condition()) {
        let filter = ObservationFilter::new().require(when);
        let kept = filter.apply(&table).unwrap();
        let mut source = table.iter();
        for row in &kept {
            prop_assert!(source.any(|o| o == row));
        }
    }

    #[test]
    fn augmenting_never_mutates_existing_rows(table in table()) {
        let variant = SyntheticVariant::ideal_from_zero_latency("Classic");
        let augmented = variant.augment(&table).unwrap();

        prop_assert_eq!(&augmented.rows()[..table.len()], table.rows());
        for copy in &augmented.rows()[table.len()..] {
            prop_assert_eq!(copy.scheduler.as_str(), "Ideal");
            prop_assert_eq!(copy.parameters["Latency ms"], 0.0);
        }
        let sources = table
            .with_scheduler("Classic")
            .filter(|o| o.parameters["Latency ms"] == 0.0)
            .count();
        prop_assert_eq!(augmented.len(), table.len() + sources);
    }

    #[test]
    fn scopes_cover_every_unshared_row_once(table in table()) {
        let config = ScopeConfig::by("Latency ms");
        let scopes = config.partition(&table).unwrap();
        let total: usize = scopes.iter().map(|s| s.len()).sum();
        prop_assert_eq!(total, table.len());

        let values: BTreeSet<u64> = scopes
            .iter()
            .filter_map(|s| s.value)
            .map(f64::to_bits)
            .collect();
        prop_assert_eq!(values.len(), scopes.len());
    }
}

//! Integration tests for Best Match / Best Close Match scoring.

use pretty_assertions::assert_eq;

use barcode_id::core::corpus::Corpus;
use barcode_id::{
    identify, AnalysisRun, CancelToken, Cancelled, Configuration, DistanceCache, MatchOutcome,
    SequenceRecord,
};

const COLUMNS: usize = 100;

fn seq(substitutions: &[usize]) -> String {
    let mut chars = vec![b'A'; COLUMNS];
    for &col in substitutions {
        chars[col] = b'T';
    }
    String::from_utf8(chars).unwrap()
}

fn rec(name: &str, species: Option<&str>, raw: &str) -> SequenceRecord {
    SequenceRecord::new(name, species.map(String::from), raw)
        .unwrap()
        .with_display_name(name)
}

fn config() -> Configuration {
    Configuration::default().with_min_overlap(50)
}

fn run(corpus: &Corpus, threshold: f64) -> identify::IdentificationReport {
    let mut cache = DistanceCache::new();
    identify::classify(corpus, &mut cache, &config(), threshold, &CancelToken::new()).unwrap()
}

fn row<'a>(
    report: &'a identify::IdentificationReport,
    query: &str,
) -> &'a identify::QueryRow {
    report
        .rows
        .iter()
        .find(|r| r.query_name == query)
        .unwrap_or_else(|| panic!("no row for {query}"))
}

#[test]
fn unique_nearest_conspecific_identifies_correctly() {
    // d(X1,X2) = 0.01 and nothing else comes close
    let corpus = Corpus::from_records(vec![
        rec("X1", Some("Xus xus"), &seq(&[])),
        rec("X2", Some("Xus xus"), &seq(&[0])),
        rec("Y1", Some("Yus yus"), &seq(&(10..16).collect::<Vec<_>>())),
        rec("Y2", Some("Yus yus"), &seq(&(10..17).collect::<Vec<_>>())),
    ]);
    let report = run(&corpus, 0.03);

    assert_eq!(row(&report, "X1").best_match, MatchOutcome::Correct);
    assert_eq!(row(&report, "X1").best_match_name.as_deref(), Some("X2"));
    assert_eq!(report.best_match.correct, 4);
    assert_eq!(report.best_match.ambiguous, 0);
    assert_eq!(report.scored_queries(), 4);
}

#[test]
fn equidistant_tie_across_species_is_ambiguous() {
    // X2 and Y1 both sit at d = 0.01 from X1
    let corpus = Corpus::from_records(vec![
        rec("X1", Some("Xus xus"), &seq(&[])),
        rec("X2", Some("Xus xus"), &seq(&[0])),
        rec("Y1", Some("Yus yus"), &seq(&[1])),
        rec("Y2", Some("Yus yus"), &seq(&(10..16).collect::<Vec<_>>())),
    ]);
    let report = run(&corpus, 0.03);

    let x1 = row(&report, "X1");
    assert_eq!(x1.best_match, MatchOutcome::Ambiguous);
    assert_eq!(x1.tie_block_size, 1);
    assert_eq!(x1.best_close_match, MatchOutcome::Ambiguous);
}

#[test]
fn near_tie_within_rounding_resolution_still_ties() {
    // the tie predicate works at 1e-5 resolution, so two neighbors whose
    // distances agree to four significant percentage digits form a block
    let corpus = Corpus::from_records(vec![
        rec("Q", Some("Xus xus"), &seq(&[])),
        rec("M1", Some("Xus xus"), &seq(&[0])),
        rec("M2", Some("Yus yus"), &seq(&[1])),
    ]);
    let report = run(&corpus, 0.03);

    // both at exactly 0.01: block of one beyond the best match, mixed
    assert_eq!(row(&report, "Q").best_match, MatchOutcome::Ambiguous);
}

#[test]
fn best_close_match_gates_on_the_threshold() {
    // X1's only neighbor is conspecific but 5% away
    let corpus = Corpus::from_records(vec![
        rec("X1", Some("Xus xus"), &seq(&[])),
        rec("X2", Some("Xus xus"), &seq(&(0..5).collect::<Vec<_>>())),
    ]);
    let report = run(&corpus, 0.03);

    let x1 = row(&report, "X1");
    assert_eq!(x1.best_match, MatchOutcome::Correct);
    assert_eq!(x1.best_close_match, MatchOutcome::NoMatch);
    assert_eq!(report.best_close_match.correct, 0);
    assert_eq!(report.best_close_match.no_match, 2);

    // a looser threshold admits the same match
    let report = run(&corpus, 0.05);
    assert_eq!(row(&report, "X1").best_close_match, MatchOutcome::Correct);
}

#[test]
fn conspecific_and_allospecific_neighbors_are_listed() {
    let corpus = Corpus::from_records(vec![
        rec("X1", Some("Xus xus"), &seq(&[])),
        rec("Y1", Some("Yus yus"), &seq(&[0])), // nearest overall
        rec("X2", Some("Xus xus"), &seq(&[0, 1])), // nearest conspecific
    ]);
    let report = run(&corpus, 0.05);

    let x1 = row(&report, "X1");
    assert_eq!(x1.best_match, MatchOutcome::Incorrect);
    let con = x1.first_conspecific.as_ref().unwrap();
    let allo = x1.first_allospecific.as_ref().unwrap();
    assert_eq!(con.name, "X2");
    assert!((con.distance - 0.02).abs() < 1e-9);
    assert_eq!(con.overlap, COLUMNS);
    assert_eq!(allo.name, "Y1");
    assert!((allo.distance - 0.01).abs() < 1e-9);
    // Y1 has no conspecific anywhere in the corpus
    assert_eq!(report.with_valid_conspecific, 2);
}

#[test]
fn accuracy_denominator_excludes_unnamed_and_unmatched() {
    let corpus = Corpus::from_records(vec![
        rec("X1", Some("Xus xus"), &seq(&[])),
        rec("X2", Some("Xus xus"), &seq(&[0])),
        // named but without a single valid comparison
        rec("lone", Some("Lus lus"), "ACGTACGTAC"),
        // no species name at all, and too far away to join X1's tie block
        rec("anon", None, &seq(&(20..24).collect::<Vec<_>>())),
    ]);
    let report = run(&corpus, 0.03);

    assert_eq!(report.total_sequences, 4);
    assert_eq!(report.without_species_name, 1);
    assert_eq!(report.no_match, 1);
    assert_eq!(report.scored_queries(), 2);
    assert_eq!(report.best_match.correct, 2);
    assert!((report.percent_of_scored(report.best_match.correct) - 100.0).abs() < 1e-9);
}

#[test]
fn query_rows_serialize_for_the_export_collaborator() {
    let corpus = Corpus::from_records(vec![
        rec("X1", Some("Xus xus"), &seq(&[])),
        rec("X2", Some("Xus xus"), &seq(&[0])),
    ]);
    let report = run(&corpus, 0.03);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"query_name\":\"X1\""));
    assert!(json.contains("\"best_match\":\"correct\""));
    assert!(json.contains("\"threshold\":0.03"));
}

#[test]
fn full_run_reports_all_three_sections() {
    let corpus = Corpus::from_records(vec![
        rec("X1", Some("Xus xus"), &seq(&[])),
        rec("X2", Some("Xus xus"), &seq(&[0])),
        rec("X3", Some("Xus cus"), &seq(&(10..14).collect::<Vec<_>>())),
    ]);
    let report = AnalysisRun::new(&corpus, config().with_cluster_threshold(0.03))
        .execute()
        .unwrap();

    assert_eq!(report.clusters.summary.cluster_count, 2);
    assert_eq!(report.identification.scored_queries(), 3);
    // X3 is congeneric with X1/X2: the interspecific distribution exists
    let inter = report.pairwise.interspecific_congeneric.unwrap();
    assert_eq!(inter.comparisons, 2);
    assert!(report.pairwise.five_percent_cutoff.is_some());
}

#[test]
fn cancelled_run_discards_everything() {
    let corpus = Corpus::from_records(vec![
        rec("X1", Some("Xus xus"), &seq(&[])),
        rec("X2", Some("Xus xus"), &seq(&[0])),
    ]);
    let run = AnalysisRun::new(&corpus, config());
    run.cancel_token().cancel();
    assert!(matches!(run.execute(), Err(Cancelled)));
}

//! Changelog and base finder against real repositories.

mod support;

use support::{Diverged, TestRepo};
use treesame::core::config::ChangelogStyle;
use treesame::engine::base_finder::find_treesame_bases;
use treesame::engine::changelog::{Changelog, FormatOptions};
use treesame::engine::EngineError;
use treesame::graph::GraphCommit;

fn summaries(commits: &[GraphCommit]) -> Vec<&str> {
    commits.iter().map(GraphCommit::summary).collect()
}

#[test]
fn bases_of_rewritten_history() {
    let fixture = Diverged::new();
    let git = fixture.repo.git();

    let bases = find_treesame_bases(&git, &["old", "new"]).unwrap();
    assert_eq!(bases[0].id, fixture.base);
    assert_eq!(bases[1].id, fixture.rewritten_base);
    assert_eq!(bases[0].tree, bases[1].tree);
}

#[test]
fn treesame_changelog_of_rewritten_history() {
    let fixture = Diverged::new();
    let git = fixture.repo.git();

    let log = Changelog::compute(&git, "old", "new", ChangelogStyle::Treesame).unwrap();
    assert_eq!(summaries(&log.added), vec!["New implementation"]);
    assert_eq!(
        summaries(&log.removed),
        vec!["Document old API", "Old implementation"]
    );
}

#[test]
fn change_id_changelog_matches_reworded_base() {
    let fixture = Diverged::new();
    let git = fixture.repo.git();

    let log = Changelog::compute(&git, "old", "new", ChangelogStyle::ChangeId).unwrap();
    assert_eq!(summaries(&log.added), vec!["New implementation"]);
    assert_eq!(
        summaries(&log.removed),
        vec!["Document old API", "Old implementation"]
    );
}

#[test]
fn formatted_output() {
    let fixture = Diverged::new();
    let git = fixture.repo.git();
    let log = Changelog::compute(&git, "old", "new", ChangelogStyle::Treesame).unwrap();

    let expected = format!(
        "  * [-{}] Document old API\n  * [-{}] Old implementation\n  * [+{}] New implementation\n",
        fixture.repo.rev_parse("old~1").short(7),
        fixture.repo.rev_parse("old").short(7),
        fixture.repo.rev_parse("new").short(7),
    );
    assert_eq!(log.format(FormatOptions::default()), expected);
}

#[test]
fn filtered_by_subdirectory() {
    let fixture = Diverged::new();
    let git = fixture.repo.git();

    let mut log = Changelog::compute(&git, "old", "new", ChangelogStyle::Treesame).unwrap();
    log.filter(&git, "src/").unwrap();
    assert_eq!(summaries(&log.added), vec!["New implementation"]);
    assert_eq!(summaries(&log.removed), vec!["Old implementation"]);
}

#[test]
fn three_new_commits_on_top() {
    let repo = TestRepo::new();
    repo.run(&["branch", "old"]);
    repo.commit_file("a.txt", "a", &["First"]);
    repo.commit_file("b.txt", "b", &["Second"]);
    repo.commit_file("c.txt", "c", &["Third"]);

    let log = Changelog::compute(&repo.git(), "old", "main", ChangelogStyle::Treesame).unwrap();
    assert_eq!(summaries(&log.added), vec!["Third", "Second", "First"]);
    assert!(log.removed.is_empty());
}

#[test]
fn cherry_pick_is_deduplicated_by_summary() {
    let repo = TestRepo::new();
    let root = repo.rev_parse("HEAD");
    repo.checkout_new("old", root.as_str());
    let fix = repo.commit_file("fix.txt", "fix", &["Fix crash"]);
    repo.checkout_new("new", root.as_str());
    repo.commit_file("feature.txt", "feature", &["Add feature"]);
    repo.run(&["cherry-pick", fix.as_str()]);

    let git = repo.git();
    let log = Changelog::compute(&git, "old", "new", ChangelogStyle::Treesame).unwrap();
    assert_eq!(summaries(&log.added), vec!["Fix crash", "Add feature"]);
    assert_eq!(summaries(&log.removed), vec!["Fix crash"]);

    let text = log.format(FormatOptions::default());
    assert_eq!(text.lines().count(), 1);
    assert!(text.ends_with("] Add feature\n"));
}

#[test]
fn unknown_ref_is_invalid_reference() {
    let repo = TestRepo::new();
    let err = Changelog::compute(&repo.git(), "main", "nope", ChangelogStyle::Treesame).unwrap_err();
    assert!(matches!(err, EngineError::InvalidReference(ref r) if r == "nope"));
}

#[test]
fn unrelated_histories_have_no_baseline() {
    let repo = TestRepo::new();
    repo.run(&["checkout", "-q", "--orphan", "other"]);
    repo.run(&["rm", "-q", "--cached", "README.md"]);
    repo.commit_file("other.txt", "o", &["Other root"]);

    let err = Changelog::compute(&repo.git(), "main", "other", ChangelogStyle::Treesame).unwrap_err();
    assert!(matches!(err, EngineError::Graph { .. }));
}

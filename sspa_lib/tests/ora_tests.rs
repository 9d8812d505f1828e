use pretty_assertions::assert_eq;
use sspa_lib::catalog::PathwayCatalog;
use sspa_lib::methods::ora::{get_ora, over_representation_analysis, ORAConfig, ORAResult};
use statrs::assert_almost_eq;

const THRESHOLD: f64 = 0.0001;

fn strings(x: &[&str]) -> Vec<String> {
    x.iter().map(|s| s.to_string()).collect()
}

fn catalog(pathways: &[(&str, &[&str])]) -> PathwayCatalog {
    pathways
        .iter()
        .map(|(id, compounds)| (id.to_string(), strings(compounds)))
        .collect()
}

#[test]
fn ora() {
    let (gmt, da_list, reference) = sspa_lib::readers::read_ora_files(
        "data/pathways.tsv",
        "data/da_list.txt",
        "data/background.txt",
    )
    .unwrap();
    let x: Vec<ORAResult> = get_ora(&da_list, &reference, &gmt, &ORAConfig::default()).unwrap();
    assert_eq!(gmt.len(), 5);
    let ids: Vec<&str> = x.iter().map(|r| r.set.as_str()).collect();
    assert_eq!(ids, vec!["PWY1", "PWY2", "PWY4"]);

    let res = x.iter().find(|x| x.set == "PWY1").unwrap();
    assert_eq!(res.name, "Glycolysis");
    assert_eq!(res.hits, "2/4");
    assert_eq!(res.coverage, "4/4");
    assert_almost_eq!(res.p, 52.0 / 220.0, THRESHOLD);

    let res = x.iter().find(|x| x.set == "PWY2").unwrap();
    assert_eq!(res.hits, "1/2");
    assert_eq!(res.coverage, "2/2");
    assert_almost_eq!(res.p, 100.0 / 220.0, THRESHOLD);

    let res = x.iter().find(|x| x.set == "PWY4").unwrap();
    assert_eq!(res.hits, "1/3");
    assert_eq!(res.coverage, "3/3");
    assert_almost_eq!(res.p, 136.0 / 220.0, THRESHOLD);

    // BH step-up makes all three adjusted values equal to the largest p-value
    for row in x.iter() {
        assert_almost_eq!(row.fdr, 136.0 / 220.0, THRESHOLD);
    }
}

#[test]
fn single_pathway() {
    let pathways = catalog(&[("P1", &["c1", "c2", "c3"])]);
    let x = over_representation_analysis(["c1", "c2"], ["c1", "c2", "c3", "c4"], &pathways)
        .unwrap();
    assert_eq!(x.len(), 1);
    assert_eq!(x[0].set, "P1");
    assert_eq!(x[0].name, "P1");
    assert_eq!(x[0].hits, "2/3");
    assert_eq!(x[0].coverage, "3/3");
    // fisher_exact([[2, 1], [0, 1]], alternative="greater")
    assert_almost_eq!(x[0].p, 0.5, THRESHOLD);
    assert_almost_eq!(x[0].fdr, 0.5, THRESHOLD);
}

#[test]
fn missing_entries_shrink_pathway() {
    let pathways = catalog(&[("P1", &["c1", "nan", "nan"])]);
    let x = over_representation_analysis(["c1", "c2"], ["c1", "c2", "c3"], &pathways).unwrap();
    assert!(x.is_empty());
}

#[test]
fn no_overlap_gives_empty_table() {
    let pathways = catalog(&[("P1", &["c3", "c4"]), ("P2", &["c4", "c5", "c6"])]);
    let x = over_representation_analysis(
        ["c1", "c2"],
        ["c1", "c2", "c3", "c4", "c5", "c6"],
        &pathways,
    )
    .unwrap();
    assert!(x.is_empty());
}

#[test]
fn empty_catalog() {
    let x = over_representation_analysis(["c1"], ["c1", "c2"], &PathwayCatalog::new()).unwrap();
    assert!(x.is_empty());
}

#[test]
fn duplicates_collapse() {
    let pathways = catalog(&[("P1", &["c1", "c1"]), ("P2", &["c1", "c2", "c2", "nan"])]);
    let x = over_representation_analysis(
        ["c1", "c1", "c3"],
        ["c1", "c2", "c3", "c4", "c4"],
        &pathways,
    )
    .unwrap();
    assert_eq!(x.len(), 1);
    assert_eq!(x[0].set, "P2");
    assert_eq!(x[0].hits, "1/2");
    assert_eq!(x[0].coverage, "2/2");
    // DA {c1, c3}, not DA {c2, c4}
    assert_eq!(x[0].table.c, 1);
    assert_eq!(x[0].table.d, 1);
}

#[test]
fn unmeasured_compounds_count_in_coverage_only() {
    // c8, c9 are not in the background
    let pathways = catalog(&[("P1", &["c1", "c2", "c8", "c9"])]);
    let x = over_representation_analysis(["c1"], ["c1", "c2", "c3", "c4"], &pathways).unwrap();
    assert_eq!(x.len(), 1);
    assert_eq!(x[0].hits, "1/2");
    assert_eq!(x[0].coverage, "2/4");
}

#[test]
fn rows_follow_catalog_order() {
    let background: Vec<String> = (1..=30).map(|i| format!("c{}", i)).collect();
    let da = ["c1", "c2", "c3", "c4", "c5", "c6"];
    let forward = catalog(&[
        ("B", &["c1", "c2", "c3", "c10"]),
        ("A", &["c4", "c11", "c12", "c13"]),
        ("Z", &["c5", "c6", "c14"]),
        ("skip", &["c20", "c21"]),
        ("M", &["c1", "c22", "c23", "c24", "c25"]),
    ]);
    let x = over_representation_analysis(da, background.clone(), &forward).unwrap();
    let ids: Vec<&str> = x.iter().map(|r| r.set.as_str()).collect();
    assert_eq!(ids, vec!["B", "A", "Z", "M"]);

    let reversed: PathwayCatalog = forward.iter().rev().cloned().collect();
    let y = over_representation_analysis(da, background, &reversed).unwrap();
    let ids: Vec<&str> = y.iter().map(|r| r.set.as_str()).collect();
    assert_eq!(ids, vec!["M", "Z", "A", "B"]);
    for row in y.iter() {
        let same = x.iter().find(|r| r.set == row.set).unwrap();
        assert_almost_eq!(row.p, same.p, 1e-12);
        assert_almost_eq!(row.fdr, same.fdr, 1e-12);
    }
}

#[test]
fn rows_are_consistent() {
    let background: Vec<String> = (1..=60).map(|i| format!("c{}", i)).collect();
    let da: Vec<String> = (1..=60).step_by(4).map(|i| format!("c{}", i)).collect();
    let pathways: PathwayCatalog = (0..12)
        .map(|k| {
            let compounds: Vec<String> = (1..=60)
                .filter(|i| i % (k + 2) == 0)
                .map(|i| format!("c{}", i))
                .collect();
            (format!("P{}", k), compounds)
        })
        .collect();
    let x = over_representation_analysis(da, background, &pathways).unwrap();
    assert!(!x.is_empty());
    for row in x.iter() {
        assert!(0.0 <= row.p && row.p <= row.fdr && row.fdr <= 1.0);
        let measured = row.hits.split('/').nth(1).unwrap();
        let covered = row.coverage.split('/').next().unwrap();
        assert_eq!(measured, covered);
        assert!(row.table.a >= 1 && row.table.a + row.table.b >= 2);
    }
    let mut by_p: Vec<&ORAResult> = x.iter().collect();
    by_p.sort_by(|a, b| a.p.total_cmp(&b.p));
    for w in by_p.windows(2) {
        assert!(w[0].fdr <= w[1].fdr + 1e-12);
    }
}

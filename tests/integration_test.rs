// End-to-end tests: build artifacts, persist them, load an engine, query it
use cinesim::{
    clamp_top_n, ArtifactStore, Artifacts, CountVectorizer, CsrMatrix, EngineConfig, Error,
    ItemRecord, Query, SimilarityEngine, SparseVector, StopWords, Vectorizer, VectorizerParams,
};
use std::collections::HashSet;

const VOCABULARY: &[&str] = &[
    "space", "robots", "adventure", "heist", "bank", "family", "comedy", "holiday", "station",
    "crew", "drama", "sci", "fi", "crime",
];

/// (title, genres, overview, popularity)
type Row = (&'static str, Option<&'static str>, &'static str, Option<f64>);

const CATALOG: &[Row] = &[
    ("Star Quest", Some("Sci-Fi,Adventure"), "robots lost in space", Some(7.5)),
    ("Robot Heist", Some("Sci-Fi,Crime"), "robots plan a bank heist", Some(6.0)),
    ("Laugh Track", Some("Comedy"), "a family comedy for the holiday", Some(8.1)),
    ("Deep Space", Some("Sci-Fi"), "the crew of a space station", None),
    ("Bank Job", Some("Crime,Drama"), "a crew pulls a bank heist", Some(4.2)),
    ("Quiet Days", None, "family drama", Some(3.0)),
];

fn build_artifacts(rows: &[Row], params: VectorizerParams) -> Artifacts {
    let vectorizer = CountVectorizer::from_params(params).unwrap();
    let items: Vec<ItemRecord> = rows
        .iter()
        .map(|&(title, genres, _, popularity)| {
            let mut record = ItemRecord::new(title);
            if let Some(genres) = genres {
                record = record.with_genres(genres);
            }
            if let Some(popularity) = popularity {
                record = record.with_popularity(popularity);
            }
            record
        })
        .collect();
    let vectors: Vec<SparseVector> = rows
        .iter()
        .map(|&(_, genres, overview, _)| {
            vectorizer.transform(&format!("{} {}", genres.unwrap_or(""), overview))
        })
        .collect();
    let matrix = CsrMatrix::from_rows(vectorizer.n_features(), &vectors).unwrap();
    Artifacts {
        items,
        vectorizer,
        matrix,
    }
}

fn catalog_params() -> VectorizerParams {
    VectorizerParams::new(VOCABULARY.iter().enumerate().map(|(i, t)| (*t, i as u32)))
        .with_stop_words(StopWords::English)
}

/// Save to a temp directory and load back, so every test crosses the storage layer
fn persisted_engine(artifacts: &Artifacts) -> (tempfile::TempDir, SimilarityEngine) {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(artifacts).unwrap();
    let engine = store.load_engine(EngineConfig::default()).unwrap();
    (dir, engine)
}

fn catalog_engine() -> (tempfile::TempDir, SimilarityEngine) {
    persisted_engine(&build_artifacts(CATALOG, catalog_params()))
}

#[test]
fn test_three_item_scenario() {
    let vectorizer = CountVectorizer::from_terms(&["action", "drama", "comedy"]).unwrap();
    let items = vec![
        ItemRecord::new("Alpha").with_genres("Action,Drama").with_popularity(5.0),
        ItemRecord::new("Beta").with_genres("Comedy").with_popularity(9.0),
        ItemRecord::new("Gamma").with_genres("Action").with_popularity(2.0),
    ];
    let matrix = CsrMatrix::from_rows(
        3,
        &[
            SparseVector::from_pairs(3, vec![(0, 1.0), (1, 1.0)]).unwrap(),
            SparseVector::from_pairs(3, vec![(2, 1.0)]).unwrap(),
            SparseVector::from_pairs(3, vec![(0, 1.0)]).unwrap(),
        ],
    )
    .unwrap();
    let (_dir, engine) = persisted_engine(&Artifacts {
        items,
        vectorizer,
        matrix,
    });

    assert_eq!(engine.popular(2), vec!["Beta", "Alpha"]);
    assert_eq!(engine.search_by_genre("action", 5), vec!["Alpha", "Gamma"]);
    assert_eq!(engine.recommend_similar("alpha", 2).unwrap(), vec!["Gamma", "Beta"]);
}

#[test]
fn test_similar_never_returns_the_query_item() {
    let (_dir, engine) = catalog_engine();
    let n = engine.corpus().len();

    for &(title, ..) in CATALOG {
        for top_n in [0, 1, 3, n, n + 5] {
            let results = engine.recommend_similar(title, top_n).unwrap();
            assert!(!results.iter().any(|t| t == title), "{} recommended itself", title);
            assert!(results.len() <= top_n.min(n - 1));

            let unique: HashSet<&String> = results.iter().collect();
            assert_eq!(unique.len(), results.len());
        }
    }
}

#[test]
fn test_similar_is_deterministic() {
    let (_dir, engine) = catalog_engine();
    let first = engine.recommend_similar("Robot Heist", 4).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.recommend_similar("Robot Heist", 4).unwrap(), first);
    }
    // Star Quest and Bank Job tie; row order decides
    assert_eq!(first, vec!["Star Quest", "Bank Job", "Deep Space", "Laugh Track"]);
}

#[test]
fn test_title_lookup_ignores_case_and_padding() {
    let (_dir, engine) = catalog_engine();
    assert_eq!(
        engine.recommend_similar("  star QUEST ", 3).unwrap(),
        engine.recommend_similar("Star Quest", 3).unwrap()
    );
}

#[test]
fn test_unknown_title_is_not_found() {
    let (_dir, engine) = catalog_engine();
    match engine.recommend_similar("Star Quest II", 3) {
        Err(Error::NotFound(title)) => assert_eq!(title, "Star Quest II"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_rankings_are_sorted_with_stable_ties() {
    let (_dir, engine) = catalog_engine();

    let ranked = engine.rank_text("space robots", engine.corpus().len());
    assert_eq!(ranked[0].id, 0);
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        if pair[0].score == pair[1].score {
            assert!(pair[0].id < pair[1].id);
        }
    }

    let ranked = engine.rank_similar("Laugh Track", engine.corpus().len()).unwrap();
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert!(ranked.iter().all(|r| (0.0..=1.0 + 1e-6).contains(&r.score)));
}

#[test]
fn test_text_search() {
    let (_dir, engine) = catalog_engine();
    let results = engine.search_by_text("A heist at the bank", 2);
    assert_eq!(results, vec!["Bank Job", "Robot Heist"]);
}

#[test]
fn test_queries_without_vocabulary_terms_fall_back_to_row_order() {
    let (_dir, engine) = catalog_engine();
    let expected = vec!["Star Quest", "Robot Heist", "Laugh Track"];

    assert_eq!(engine.search_by_text("", 3), expected);
    assert_eq!(engine.search_by_text("the of and", 3), expected);
    assert_eq!(engine.search_by_text("zebra", 3), expected);
    assert!(engine.rank_text("the", 6).iter().all(|r| r.score == 0.0));
}

#[test]
fn test_genre_search() {
    let (_dir, engine) = catalog_engine();

    assert_eq!(
        engine.search_by_genre("sci-fi", 10),
        vec!["Star Quest", "Robot Heist", "Deep Space"]
    );
    assert_eq!(engine.search_by_genre("CRIME", 10), vec!["Robot Heist", "Bank Job"]);
    assert_eq!(engine.search_by_genre("sci-fi", 1), vec!["Star Quest"]);
    assert!(engine.search_by_genre("western", 10).is_empty());

    // the empty needle matches every item that has genres at all
    let all = engine.search_by_genre("", 10);
    assert_eq!(all.len(), 5);
    assert!(!all.iter().any(|t| t == "Quiet Days"));
}

#[test]
fn test_popular_orders_by_popularity_with_missing_values_last() {
    let (_dir, engine) = catalog_engine();
    assert_eq!(
        engine.popular(10),
        vec!["Laugh Track", "Star Quest", "Robot Heist", "Bank Job", "Quiet Days", "Deep Space"]
    );
    assert_eq!(engine.popular(2), vec!["Laugh Track", "Star Quest"]);
}

#[test]
fn test_popular_without_popularity_uses_row_order() {
    let rows: Vec<Row> = CATALOG
        .iter()
        .map(|&(title, genres, overview, _)| (title, genres, overview, None))
        .collect();
    let (_dir, engine) = persisted_engine(&build_artifacts(&rows, catalog_params()));

    assert!(!engine.corpus().has_popularity());
    assert_eq!(engine.popular(3), vec!["Star Quest", "Robot Heist", "Laugh Track"]);
}

#[test]
fn test_top_n_clamping() {
    let (_dir, engine) = catalog_engine();
    let n = engine.corpus().len();

    assert!(engine.popular(clamp_top_n(-3, n)).is_empty());
    assert!(engine.search_by_text("space", clamp_top_n(0, n)).is_empty());
    assert_eq!(engine.popular(clamp_top_n(100, n)).len(), n);
    assert_eq!(engine.recommend_similar("Deep Space", clamp_top_n(100, n)).unwrap().len(), n - 1);
}

#[test]
fn test_queries_from_json() {
    let (_dir, engine) = catalog_engine();

    let query: Query =
        serde_json::from_str(r#"{"mode":"genre","genre":"crime","top_n":5}"#).unwrap();
    assert_eq!(query.execute(&engine).unwrap(), vec!["Robot Heist", "Bank Job"]);

    let query: Query =
        serde_json::from_str(r#"{"mode":"similar","title":"Nope","top_n":5}"#).unwrap();
    assert!(matches!(query.execute(&engine), Err(Error::NotFound(_))));
}

#[test]
fn test_vectorizer_matrix_mismatch_rejected_at_load() {
    let mut artifacts = build_artifacts(CATALOG, catalog_params());
    artifacts.vectorizer = CountVectorizer::from_terms(&["space", "robots"]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&artifacts).unwrap();

    let err = store.load_engine(EngineConfig::default()).err().unwrap();
    match err.downcast_ref::<Error>() {
        Some(Error::ConfigurationMismatch { vectorizer, matrix }) => {
            assert_eq!(*vectorizer, 2);
            assert_eq!(*matrix, VOCABULARY.len());
        }
        other => panic!("expected ConfigurationMismatch, got {:?}", other),
    }
}

#[test]
fn test_permuted_vocabulary_loads_but_ranks_text_differently() {
    let matched = build_artifacts(CATALOG, catalog_params());
    let (_matched_dir, matched_engine) = persisted_engine(&matched);

    // same terms and width, columns assigned in reverse
    let last = VOCABULARY.len() as u32 - 1;
    let permuted_params =
        VectorizerParams::new(VOCABULARY.iter().enumerate().map(|(i, t)| (*t, last - i as u32)))
            .with_stop_words(StopWords::English);
    let mut permuted = build_artifacts(CATALOG, catalog_params());
    permuted.vectorizer = CountVectorizer::from_params(permuted_params).unwrap();
    assert_eq!(permuted.vectorizer.n_features(), permuted.matrix.n_cols());

    let (_permuted_dir, permuted_engine) = persisted_engine(&permuted);

    // item-to-item scores only read the matrix
    assert_eq!(
        permuted_engine.recommend_similar("Star Quest", 5).unwrap(),
        matched_engine.recommend_similar("Star Quest", 5).unwrap()
    );

    let expected = matched_engine.search_by_text("space robots", 6);
    assert_eq!(expected[0], "Star Quest");
    assert_ne!(permuted_engine.search_by_text("space robots", 6), expected);
}

#[test]
fn test_parallel_engine_matches_sequential() {
    let artifacts = build_artifacts(CATALOG, catalog_params());
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&artifacts).unwrap();

    let sequential = store.load_engine(EngineConfig::default()).unwrap();
    let parallel = store
        .load_engine(EngineConfig {
            parallel_threshold: 1,
        })
        .unwrap();

    for &(title, ..) in CATALOG {
        assert_eq!(
            sequential.recommend_similar(title, 6).unwrap(),
            parallel.recommend_similar(title, 6).unwrap()
        );
    }
    assert_eq!(
        sequential.search_by_text("family holiday", 6),
        parallel.search_by_text("family holiday", 6)
    );
}

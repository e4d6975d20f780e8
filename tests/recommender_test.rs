mod common;

use std::sync::{Arc, Mutex};
use std::thread;

use croprec::{Crop, ModelArtifacts, Recommendation, Recommender, RecommenderError};
use common::{rice_field, stub_artifacts, FirstColumn, Recording};

#[test]
fn test_rice_example() -> Result<(), RecommenderError> {
    let recommender = Recommender::builder()
        .with_artifacts(stub_artifacts(1))
        .build()?;

    let recommendation = recommender.recommend(&rice_field())?;
    assert_eq!(recommendation.crop(), Some(Crop::Rice));
    assert_eq!(recommendation.message(), "Recommended Crop: Rice");
    Ok(())
}

#[test]
fn test_unknown_label_is_not_an_error() -> Result<(), RecommenderError> {
    for label in [0, 23, 99] {
        let recommender = Recommender::new(stub_artifacts(label));
        let recommendation = recommender.recommend(&rice_field())?;
        assert_eq!(recommendation, Recommendation::Undetermined { label });
        assert_eq!(
            recommendation.message(),
            "Sorry, we could not determine the best crop with the provided data."
        );
    }
    Ok(())
}

#[test]
fn test_every_known_label() -> Result<(), RecommenderError> {
    for crop in Crop::ALL {
        let recommender = Recommender::new(stub_artifacts(crop.label()));
        assert_eq!(recommender.recommend(&rice_field())?.crop(), Some(crop));
    }
    Ok(())
}

#[test]
fn test_deterministic() -> Result<(), RecommenderError> {
    let recommender = Recommender::new(stub_artifacts(7));
    let first = recommender.recommend(&rice_field())?;
    for _ in 0..10 {
        assert_eq!(recommender.recommend(&rice_field())?, first);
    }
    Ok(())
}

/// Min-max (x + 1) then standard (x * 2) turns nitrogen 4 into 10 (Watermelon).
/// The reversed order would give 4 * 2 + 1 = 9 (Muskmelon).
#[test]
fn test_minmax_runs_before_standard() -> Result<(), RecommenderError> {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let artifacts = ModelArtifacts::new(
        Arc::new(FirstColumn { calls: Arc::clone(&calls) }),
        Arc::new(Recording { name: "standard", factor: 2.0, offset: 0.0, calls: Arc::clone(&calls) }),
        Arc::new(Recording { name: "minmax", factor: 1.0, offset: 1.0, calls: Arc::clone(&calls) }),
    );
    let recommender = Recommender::new(Arc::new(artifacts));

    let readings = croprec::SoilReadings { nitrogen: 4.0, ..rice_field() };
    let recommendation = recommender.recommend(&readings)?;

    assert_eq!(*calls.lock().unwrap(), vec!["minmax", "standard", "classifier"]);
    assert_eq!(recommendation.crop(), Some(Crop::Watermelon));
    Ok(())
}

#[test]
fn test_out_of_range_input_is_forwarded() -> Result<(), RecommenderError> {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let artifacts = ModelArtifacts::new(
        Arc::new(FirstColumn { calls: Arc::clone(&calls) }),
        Arc::new(common::Identity),
        Arc::new(common::Identity),
    );
    let recommender = Recommender::new(Arc::new(artifacts));

    // Nitrogen far above the form's limit still reaches the classifier.
    let readings = croprec::SoilReadings { nitrogen: 1000.0, ph: 20.0, ..rice_field() };
    assert_eq!(
        recommender.recommend(&readings)?,
        Recommendation::Undetermined { label: 1000 }
    );
    Ok(())
}

#[test]
fn test_concurrent_recommendations() {
    let recommender = Arc::new(Recommender::new(stub_artifacts(22)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let recommender = Arc::clone(&recommender);
            thread::spawn(move || recommender.recommend(&rice_field()).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().crop(), Some(Crop::Coffee));
    }
}

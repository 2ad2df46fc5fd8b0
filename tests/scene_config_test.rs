/// 场景配置与放置流程测试

#[cfg(test)]
mod tests {
    use catzone::algorithms::*;
    use catzone::config::SceneConfig;
    use catzone::scene::{SceneBuilder, MAX_BEACONS};
    use catzone::Error;

    const SCENE_JSON: &str = r#"{
        "beacons": [
            {"id": "gate", "name": "Garden gate", "x": 100, "y": 100},
            {"x": 700, "y": 100},
            {"x": 400, "y": 520}
        ],
        "obstacles": [
            [{"x": 300, "y": 220}, {"x": 380, "y": 220}, {"x": 380, "y": 300}, {"x": 300, "y": 300}]
        ],
        "nominal_range": 8.0,
        "sigma": 0.1
    }"#;

    #[test]
    fn test_scene_from_json() {
        let config = SceneConfig::from_json(SCENE_JSON).unwrap();
        assert_eq!(config.beacons.len(), 3);
        assert_eq!(config.scale, 40.0);
        assert_eq!(config.grid.width, 40);

        let scene = config.into_scene().unwrap();
        assert_eq!(scene.beacons()[0].id, "gate");
        assert_eq!(scene.beacons()[0].name, "Garden gate");
        assert_eq!(scene.beacons()[1].id, "B2");
        assert_eq!(scene.obstacles().len(), 1);
        assert_eq!(scene.model().nominal_range, 8.0);
        assert_eq!(scene.grid().cell_count(), 1200);
    }

    #[test]
    fn test_scene_load_from_file() {
        let path = std::env::temp_dir().join(format!("catzone_scene_{}.json", std::process::id()));
        std::fs::write(&path, SCENE_JSON).unwrap();

        let scene = SceneConfig::load(&path).unwrap().into_scene().unwrap();
        std::fs::remove_file(&path).ok();

        let target = scene.grid().cell_center(30, 20);
        let detection = scene.detect(target);
        println!(
            "实际: {}, 估计: {}, 置信度: {:.3}",
            detection.target,
            detection.localization,
            detection.localization.confidence
        );
        assert_eq!(detection.localization.best_cell, Some((30, 20)));
        assert_eq!(detection.error(scene.model().scale), Some(0.0));
    }

    #[test]
    fn test_scene_load_missing_file() {
        let result = SceneConfig::load("/nonexistent/catzone/scene.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_scene_bad_json() {
        assert!(matches!(
            SceneConfig::from_json("{\"beacons\": 3}"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_non_convex_obstacle_rejected() {
        let json = r#"{
            "beacons": [{"x": 10, "y": 10}],
            "obstacles": [[{"x": 0, "y": 0}, {"x": 10, "y": 10}, {"x": 10, "y": 0}, {"x": 0, "y": 10}]]
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert!(matches!(config.into_scene(), Err(Error::NonConvexObstacle)));
    }

    #[test]
    fn test_negative_coefficients_rejected() {
        let json = r#"{
            "beacons": [{"x": 0, "y": 0}],
            "obstacles": [[{"x": 100, "y": -40}, {"x": 180, "y": -40}, {"x": 180, "y": 40}, {"x": 100, "y": 40}]],
            "rolloff": -0.8
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert!(matches!(config.into_scene(), Err(Error::InvalidRolloff(_))));

        let json = r#"{"beacons": [{"x": 0, "y": 0}], "attenuation": -0.5}"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert!(matches!(
            config.into_scene(),
            Err(Error::InvalidAttenuation(_))
        ));
    }

    #[test]
    fn test_configured_strengths_stay_in_unit_interval() {
        let json = r#"{
            "beacons": [{"x": 0, "y": 0}],
            "obstacles": [[{"x": 100, "y": -40}, {"x": 180, "y": -40}, {"x": 180, "y": 40}, {"x": 100, "y": 40}]],
            "attenuation": 0.9,
            "rolloff": 1.2
        }"#;
        let scene = SceneConfig::from_json(json).unwrap().into_scene().unwrap();
        for x in [20.0, 160.0, 400.0, 800.0] {
            let strengths = scene.measure_at(&Point::new(x, 0.0));
            assert!(
                strengths.iter().all(|s| *s > 0.0 && *s <= 1.0),
                "x = {}: {:?}",
                x,
                strengths
            );
        }
    }

    #[test]
    fn test_too_many_beacons_in_config() {
        let mut config = SceneConfig::default();
        for i in 0..=MAX_BEACONS {
            config.push_beacon(Point::new(50.0 * i as f64, 50.0));
        }
        assert!(matches!(
            config.into_scene(),
            Err(Error::TooManyBeacons { .. })
        ));
    }

    #[test]
    fn test_builder_workflow() {
        let mut builder = SceneBuilder::new(Area::default(), 40.0);
        builder.add_beacon(Point::new(100.0, 100.0)).unwrap();
        builder.set_range_from_last_beacon(Point::new(100.0, 340.0));
        builder.add_beacon(Point::new(700.0, 500.0)).unwrap();
        builder
            .add_obstacle(&[
                Point::new(350.0, 250.0),
                Point::new(450.0, 250.0),
                Point::new(450.0, 350.0),
                Point::new(350.0, 350.0),
            ])
            .unwrap();
        assert_eq!(builder.nominal_range(), 6.0);

        let scene = builder.build().unwrap();
        let measured = scene.measure_at(&Point::new(400.0, 300.0));
        assert_eq!(measured.len(), 2);
        assert!(measured.iter().all(|s| *s > 0.0 && *s <= 1.0));

        let coverage = scene.coverage();
        assert!(coverage.max_total > 0.0);
        assert_eq!(coverage.intensities().max(), 1.0);
    }
}

/// 定位场景测试
///
/// 用模型合成测量，再反推位置，验证估计精度与遮挡影响

#[cfg(test)]
mod tests {
    use catzone::algorithms::*;

    #[test]
    fn test_two_beacons_recover_midpoint() {
        let beacons = vec![
            Beacon::new("B1", "Beacon1", 0.0, 0.0),
            Beacon::new("B2", "Beacon2", 10.0, 0.0),
        ];
        let model = PropagationModel::unscaled(5.0);
        // 单元格 0.5 × 0.5，(10, 14) 的中心恰好是 (5, 0)
        let grid = GridSpec::new(Area::new(-0.25, -7.25, 20.0, 15.0), 40, 30).unwrap();
        let truth = Point::new(5.0, 0.0);

        let measured = model.expected_strength_vector(&beacons, &truth, &[]);
        assert_eq!(measured, vec![0.5, 0.5]);

        let result = localize(&beacons, &measured, &model, &[], &grid, 0.1);
        let estimate = result.estimate.expect("应当得到估计位置");
        println!("估计位置: {}, 置信度: {:.4}", estimate, result.confidence);

        assert!(estimate.distance_to(&truth) <= grid.cell_width());
        assert!(result.confidence > 0.99);
        assert_eq!(result.beacon_count, 2);
    }

    #[test]
    fn test_three_beacons_with_building() {
        let beacons = vec![
            Beacon::new("B1", "Beacon1", 80.0, 80.0),
            Beacon::new("B2", "Beacon2", 720.0, 80.0),
            Beacon::new("B3", "Beacon3", 400.0, 540.0),
        ];
        let obstacles =
            vec![Obstacle::rectangle(Point::new(300.0, 220.0), Point::new(380.0, 300.0)).unwrap()];
        let model = PropagationModel::new(8.0, 40.0);
        let grid = GridSpec::with_default_resolution(Area::default()).unwrap();

        // (250, 250) 位于单元格 (12, 12) 的中心
        let truth = grid.cell_center(12, 12);
        assert_eq!(truth, Point::new(250.0, 250.0));

        let measured = model.expected_strength_vector(&beacons, &truth, &obstacles);
        let result = localize(&beacons, &measured, &model, &obstacles, &grid, 0.1);

        assert_eq!(result.best_cell, Some((12, 12)));
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.error_to(&truth, model.scale), Some(0.0));
    }

    #[test]
    fn test_obstacle_lowers_every_likelihood() {
        let beacons = vec![Beacon::new("B1", "Beacon1", -5.0, 5.0)];
        // 一堵竖直的墙，将信标与整个区域隔开
        let wall = Obstacle::new(&[
            Point::new(-3.0, -100.0),
            Point::new(-2.0, -100.0),
            Point::new(-2.0, 100.0),
            Point::new(-3.0, 100.0),
        ])
        .unwrap();
        let model = PropagationModel::unscaled(20.0);
        let grid = GridSpec::new(Area::sized(10.0, 10.0), 40, 30).unwrap();
        let measured = [1.0];

        let open = localize(&beacons, &measured, &model, &[], &grid, 0.5);
        let walled = localize(&beacons, &measured, &model, &[wall], &grid, 0.5);

        let open_values = open.grid.as_ref().unwrap().values();
        let walled_values = walled.grid.as_ref().unwrap().values();
        assert_eq!(open_values.len(), walled_values.len());
        for (i, (o, w)) in open_values.iter().zip(walled_values).enumerate() {
            assert!(w < o, "cell {}: {} >= {}", i, w, o);
        }
        assert!(walled.confidence < open.confidence);
    }

    #[test]
    fn test_measurement_length_mismatch_uses_overlap() {
        let beacons = vec![
            Beacon::new("B1", "Beacon1", 0.0, 0.0),
            Beacon::new("B2", "Beacon2", 10.0, 0.0),
        ];
        let model = PropagationModel::unscaled(5.0);
        let grid = GridSpec::new(Area::sized(10.0, 10.0), 20, 20).unwrap();

        let result = localize(&beacons, &[0.5], &model, &[], &grid, 0.1);
        assert!(result.is_informative());
        assert_eq!(result.beacon_count, 1);
    }

    #[test]
    fn test_weighted_centroid_versus_grid() {
        let beacons = vec![
            Beacon::new("B1", "Beacon1", 100.0, 300.0),
            Beacon::new("B2", "Beacon2", 700.0, 300.0),
        ];
        let model = PropagationModel::default();
        let grid = GridSpec::with_default_resolution(Area::default()).unwrap();
        let truth = Point::new(190.0, 310.0);

        let measured = model.expected_strength_vector(&beacons, &truth, &[]);
        let centroid = LocationAlgorithm::weighted_centroid(&beacons, &measured).unwrap();
        let result = localize(&beacons, &measured, &model, &[], &grid, 0.1);
        let estimate = result.estimate.unwrap();

        println!("加权质心: {}, 网格估计: {}", centroid, estimate);
        // 质心被限制在信标连线上，网格估计更接近真实位置
        assert!(estimate.distance_to(&truth) <= centroid.distance_to(&truth));
    }
}

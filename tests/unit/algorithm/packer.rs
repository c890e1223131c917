//! Tests for the backtracking packer

#[cfg(test)]
mod tests {
    use shapefit::PackingError;
    use shapefit::algorithm::canonical::{Orientation, OrientationTable, RawShape};
    use shapefit::algorithm::ordering::{ItemOrder, build_items};
    use shapefit::algorithm::packer::{Packer, Placement};
    use shapefit::spatial::Grid;

    const MONOMINO: &[&str] = &["#"];
    const DOMINO: &[&str] = &["##"];
    const L_TROMINO: &[&str] = &["#.", "##"];
    const I_TROMINO: &[&str] = &["###"];

    fn table(shapes: &[&[&str]]) -> OrientationTable {
        let raw: Vec<RawShape> = shapes
            .iter()
            .enumerate()
            .map(|(id, rows)| RawShape::from_text(id, rows))
            .collect();
        OrientationTable::build(&raw).unwrap()
    }

    fn packer<'a>(table: &'a OrientationTable, counts: &[usize], slack: usize) -> Packer<'a> {
        let items = build_items(table, counts, ItemOrder::LargestFirst).unwrap();
        Packer::new(table, items, slack)
    }

    // Tests a single domino fills a 2x1 grid with one placement
    // Verified by skipping the horizontal orientation
    #[test]
    fn test_single_domino() {
        let table = table(&[DOMINO]);
        let mut packer = packer(&table, &[1], 0);
        let mut grid = Grid::<u64>::new(2, 1).unwrap();

        assert!(packer.pack(&mut grid, 0).unwrap());
        assert_eq!(packer.nodes(), 1);
        assert_eq!(grid.rows(), &[0b11]);
        assert_eq!(packer.total_area(), 2);
    }

    // Tests too much area is pruned before any placement
    // Verified by disabling the estimator gate in open
    #[test]
    fn test_overfull_grid_pruned() {
        let table = table(&[L_TROMINO]);
        let mut packer = packer(&table, &[2], 20);
        let mut grid = Grid::<u64>::new(2, 2).unwrap();

        assert!(!packer.pack(&mut grid, 0).unwrap());
        assert_eq!(packer.nodes(), 0);
        assert_eq!(grid.occupied(), 0);
    }

    // Tests nine monominoes fill a 3x3 grid without backtracking
    // Verified by restarting every copy from the origin
    #[test]
    fn test_monominoes_fill_grid() {
        let table = table(&[MONOMINO]);
        let mut packer = packer(&table, &[9], 0);
        let mut grid = Grid::<u64>::new(3, 3).unwrap();

        assert!(packer.pack(&mut grid, 0).unwrap());
        assert_eq!(packer.nodes(), 9);
        assert_eq!(grid.rows(), &[0b111, 0b111, 0b111]);
    }

    // Tests copies of a shape are placed in row-major order
    // Verified by ignoring the predecessor's placement when opening an item
    #[test]
    fn test_copies_placed_in_row_major_order() {
        let table = table(&[MONOMINO]);
        let mut packer = packer(&table, &[4], 0);
        let mut grid = Grid::<u64>::new(2, 2).unwrap();

        assert!(packer.pack(&mut grid, 0).unwrap());
        let positions: Vec<(usize, usize)> = packer
            .layout()
            .iter()
            .map(|placement| (placement.row, placement.col))
            .collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    // Tests the layout reports orientation index and position per item
    // Verified by recording the cursor position after advancing
    #[test]
    fn test_layout_of_two_dominoes() {
        let table = table(&[DOMINO]);
        let mut packer = packer(&table, &[2], 0);
        let mut grid = Grid::<u64>::new(4, 1).unwrap();

        assert!(packer.pack(&mut grid, 0).unwrap());
        assert_eq!(packer.nodes(), 2);
        assert_eq!(
            packer.layout(),
            vec![
                Placement {
                    shape: 0,
                    orientation: 1,
                    row: 0,
                    col: 0
                },
                Placement {
                    shape: 0,
                    orientation: 1,
                    row: 0,
                    col: 2
                },
            ]
        );
        assert_eq!(packer.items().len(), 2);
        assert_eq!(packer.items()[1].placed_col, 2);
    }

    // Tests a failed search leaves the grid exactly as it found it
    // Verified by skipping the removal when a cursor is advanced
    #[test]
    fn test_infeasible_search_restores_grid() {
        let table = table(&[L_TROMINO, I_TROMINO]);
        let mut packer = packer(&table, &[1, 1], 0);
        let mut grid = Grid::<u64>::new(3, 3).unwrap();
        grid.place(&Orientation::new(3, vec![0b111]), 2, 0);
        let snapshot = grid.clone();

        assert!(!packer.pack(&mut grid, 0).unwrap());
        assert!(packer.nodes() > 0);
        assert_eq!(grid, snapshot);
    }

    // Tests the node limit aborts the search and unwinds every placement
    // Verified by returning without unwinding the stack
    #[test]
    fn test_node_limit_unwinds() {
        let table = table(&[L_TROMINO, I_TROMINO]);
        let mut packer = packer(&table, &[1, 1], 0).with_node_limit(Some(1));
        let mut grid = Grid::<u64>::new(3, 3).unwrap();
        grid.place(&Orientation::new(3, vec![0b111]), 2, 0);
        let snapshot = grid.clone();

        let result = packer.pack(&mut grid, 0);
        assert!(matches!(
            result,
            Err(PackingError::NodeLimitExceeded { nodes: 2 })
        ));
        assert_eq!(grid, snapshot);
    }

    // Tests a limit that is never reached does not change the outcome
    // Verified by comparing the limit with >= instead of >
    #[test]
    fn test_node_limit_not_reached() {
        let table = table(&[MONOMINO]);
        let mut packer = packer(&table, &[9], 0).with_node_limit(Some(9));
        let mut grid = Grid::<u64>::new(3, 3).unwrap();

        assert!(packer.pack(&mut grid, 0).unwrap());
        assert_eq!(packer.nodes(), 9);
    }

    // Tests packing past the last item succeeds immediately
    // Verified by treating an exhausted item list as pruned
    #[test]
    fn test_pack_after_last_item() {
        let table = table(&[MONOMINO]);
        let mut packer = packer(&table, &[2], 0);
        let mut grid = Grid::<u64>::new(1, 1).unwrap();

        assert!(packer.pack(&mut grid, 2).unwrap());
        assert_eq!(packer.nodes(), 0);
    }

    // Tests a copy moves on to later orientations when earlier ones collide
    // Verified by stopping after the first orientation is exhausted
    #[test]
    fn test_later_orientation_completes() {
        let table = table(&[L_TROMINO]);
        let mut packer = packer(&table, &[2], 0);
        let mut grid = Grid::<u64>::new(3, 2).unwrap();

        assert!(packer.pack(&mut grid, 0).unwrap());
        assert_eq!(grid.rows(), &[0b111, 0b111]);

        let layout = packer.layout();
        assert_eq!(layout.len(), 2);
        assert_ne!(layout[0].orientation, layout[1].orientation);
    }

    // Tests the packer works on wide rows
    // Verified by truncating widened masks to 64 bits
    #[test]
    fn test_wide_grid() {
        let table = table(&[I_TROMINO]);
        let mut packer = packer(&table, &[30], 0);
        let mut grid = Grid::<u128>::new(90, 1).unwrap();

        assert!(packer.pack(&mut grid, 0).unwrap());
        assert_eq!(grid.free(), 0);
        assert_eq!(packer.nodes(), 30);
    }
}

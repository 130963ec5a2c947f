use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use gg_core::storage::SliceStorage;
use gg_core::{CoordinatePair, Grid, GridError};

#[test]
fn record_survives_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drawing.ggr");

    let mut grid = Grid::new(6, 30, b'.');
    for pair in [
        CoordinatePair::new(0, 5, 1, 4),
        CoordinatePair::new(1, 4, 2, 3),
        CoordinatePair::new(2, 3, 3, 3),
        CoordinatePair::new(3, 3, 3, 2),
    ] {
        assert!(grid.plot(pair).is_some());
    }

    {
        let mut w = BufWriter::new(File::create(&path).unwrap());
        grid.write_record(&mut w).unwrap();
        w.flush().unwrap();
    }
    assert_eq!(
        std::fs::metadata(&path).unwrap().len(),
        9 + 6 * 30,
        "header plus raw cells"
    );

    let mut r = BufReader::new(File::open(&path).unwrap());
    let restored = Grid::from_record(&mut r).unwrap();
    assert_eq!(restored, grid);
    assert_eq!(restored.cells(), grid.cells());
}

#[test]
fn record_loads_into_borrowed_storage() {
    let grid = Grid::new(3, 7, b'+');
    let bytes = grid.to_record();

    let mut backing = [0u8; 64];
    let mut target = Grid::with_storage(1, 2, b' ', SliceStorage::new(&mut backing)).unwrap();
    target.read_record(&mut bytes.as_slice()).unwrap();
    assert_eq!(target.cells(), grid.cells());
    assert_eq!((target.rows(), target.cols(), target.fill()), (3, 7, b'+'));
}

#[test]
fn truncated_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.ggr");
    let bytes = Grid::new(4, 4, b' ').to_record();
    std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let err = Grid::from_record(&mut File::open(&path).unwrap()).unwrap_err();
    assert!(matches!(err, GridError::Io(_)));
}

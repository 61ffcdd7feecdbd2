//! End-to-end usage scenarios for `DynamicArray`.

use dynarr::{dynarr, ArrayError, DynamicArray};

fn log_prelude() {
    // Ignore the error from a second init in the same test binary.
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .without_timestamps()
        .init();
}

#[test]
fn capacity_constructor_then_resize() {
    log_prelude();
    let mut v: DynamicArray<i32> = DynamicArray::with_capacity(5).unwrap();
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), 5);

    v.resize(10).unwrap();
    assert_eq!(v.len(), 10);
    assert!(v.capacity() >= 10);
}

#[test]
fn push_pop_front_back_and_indexing() {
    log_prelude();
    let mut v = DynamicArray::with_capacity(5).unwrap();
    v.push_back(1).unwrap();
    assert_eq!(v[0], 1);
    v.push_back(2).unwrap();
    v.push_back(3).unwrap();
    assert_eq!(v.len(), 3);
    assert_eq!(v.front(), Ok(&1));
    assert_eq!(v.back(), Ok(&3));
    v.pop_back().unwrap();
    assert_eq!(v.len(), 2);
    assert_eq!(v.back(), Ok(&2));
}

#[test]
fn literal_construction() {
    let v = dynarr![1, 2].unwrap();
    assert_eq!(v.len(), 2);
    assert_eq!(v[0], 1);
    assert_eq!(v[1], 2);

    let empty: DynamicArray<u8> = dynarr![].unwrap();
    assert_eq!((empty.len(), empty.capacity()), (0, 0));
}

#[test]
fn iteration_matches_indexing() {
    let v = dynarr![0, 1, 2, 3, 4, 5].unwrap();

    let mut cursor = v.begin();
    assert_eq!(v.resolve(&cursor), v.front());
    v.advance(&mut cursor).unwrap();
    assert_eq!(v.resolve(&cursor).unwrap(), &v[1]);

    let mut i = 0;
    let mut cursor = v.begin();
    while cursor != v.end() {
        assert_eq!(v.resolve(&cursor).unwrap(), &v[i]);
        v.advance(&mut cursor).unwrap();
        i += 1;
    }
    assert_eq!(i, 6);

    for (i, x) in v.iter().enumerate() {
        assert_eq!(x, v.at(i).unwrap());
    }
    // Restartable: a second pass sees the same sequence.
    assert_eq!(v.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn assignment_produces_an_independent_copy() {
    let source = dynarr![1, 2, 3].unwrap();
    let mut dest: DynamicArray<i32> = DynamicArray::new().unwrap();
    dest.assign(&source).unwrap();
    assert_eq!(dest, source);

    dest[1] = 99;
    assert_eq!(source[1], 2);
    assert_eq!(dest, [1, 99, 3]);
}

#[test]
fn copy_construction_produces_an_independent_copy() {
    let mut source = dynarr![String::from("a"), String::from("b")].unwrap();
    let copy = source.clone();
    source[0].push('!');
    source.push_back(String::from("c")).unwrap();
    assert_eq!(copy, [String::from("a"), String::from("b")]);
    assert_eq!(source.len(), 3);
}

#[test]
fn empty_access_errors_then_recovers() {
    let mut v: DynamicArray<i32> = DynamicArray::new().unwrap();
    assert!(matches!(v.front(), Err(ArrayError::EmptyContainer { .. })));
    assert!(matches!(v.back(), Err(ArrayError::EmptyContainer { .. })));
    assert!(matches!(v.at(0), Err(ArrayError::IndexOutOfRange { .. })));
    assert!(matches!(v.pop_back(), Err(ArrayError::EmptyContainer { .. })));
    v.push_back(5).unwrap();
    assert_eq!(v.front(), Ok(&5));
}

#[test]
fn index_boundaries() {
    let v = dynarr![10, 20, 30].unwrap();
    assert_eq!(v.at(2), Ok(&30));
    assert_eq!(v.at(3), Err(ArrayError::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(v.at(4), Err(ArrayError::IndexOutOfRange { index: 4, len: 3 }));
}

#[test]
fn push_then_pop_is_identity() {
    let mut v = dynarr![1, 2, 3].unwrap();
    v.push_back(4).unwrap();
    assert_eq!(v.pop_back(), Ok(4));
    assert_eq!(v, [1, 2, 3]);
}

#[test]
fn errors_render_for_callers() {
    let v: DynamicArray<i32> = DynamicArray::new().unwrap();
    let err: Box<dyn std::error::Error> = Box::new(v.front().unwrap_err());
    assert_eq!(err.to_string(), "front called on an empty array");
}

#[test]
fn array_moves_across_threads() {
    let v = dynarr![1u64, 2, 3].unwrap();
    let handle = std::thread::spawn(move || {
        let mut v = v;
        v.push_back(4).unwrap();
        v
    });
    let v = handle.join().unwrap();
    assert_eq!(v, [1, 2, 3, 4]);
}

/// Every subset of `items` with at least two elements.
///
/// Masks run `1..2^n` ascending and each subset keeps the relative order of
/// `items`, so output is deterministic for a given selection order. The mask
/// is a `u32`; callers keep `n` within the selection cap.
pub fn enumerate_combinations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    debug_assert!(items.len() < u32::BITS as usize);

    let n = items.len() as u32;
    let mut out = Vec::new();
    for mask in 1u32..(1u32 << n) {
        if mask.count_ones() < 2 {
            continue;
        }
        let subset = items
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, item)| item.clone())
            .collect();
        out.push(subset);
    }
    out
}

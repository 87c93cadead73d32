/// Arithmetic mean across sibling slots. Purely derived — reported on its own
/// timer, never fed back into sampling.
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_three_slots() {
        assert_eq!(mean(&[40.0, 50.0, 60.0]), 50.0);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }
}

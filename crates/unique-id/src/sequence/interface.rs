/// A source of per-tick sequence values.
///
/// Each call returns the next value of one named counter. Implementations
/// used for ID generation must hand concurrent callers distinct values and
/// keep every value within the target field, typically by wrapping at
/// `2^width`. Values outside the field are rejected by checked assembly.
///
/// Any `Fn() -> i64` closure is a sequence source, which makes it easy to
/// bridge an external counter such as a database sequence.
///
/// # Example
///
/// ```
/// use unique_id::sequence::SequenceSource;
///
/// let next = || 7_i64;
/// assert_eq!(next.next_value(), 7);
/// ```
pub trait SequenceSource {
    /// Returns the current value and advances the counter.
    fn next_value(&self) -> i64;
}

impl<F> SequenceSource for F
where
    F: Fn() -> i64,
{
    fn next_value(&self) -> i64 {
        self()
    }
}

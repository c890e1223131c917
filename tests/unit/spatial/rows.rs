//! Tests for grid row word types

#[cfg(test)]
mod tests {
    use shapefit::spatial::RowBits;

    // Tests each row type reports its column capacity
    // Verified by returning the byte size instead of the bit count
    #[test]
    fn test_row_capacity() {
        assert_eq!(<u64 as RowBits>::BITS, 64);
        assert_eq!(<u128 as RowBits>::BITS, 128);
    }

    // Tests masks widen without changing their value
    // Verified by shifting the mask into the upper half when widening
    #[test]
    fn test_from_mask() {
        assert_eq!(<u64 as RowBits>::from_mask(0b1011), 0b1011_u64);
        assert_eq!(<u128 as RowBits>::from_mask(u64::MAX), u128::from(u64::MAX));
        assert_eq!(<u128 as RowBits>::from_mask(1) << 100, 1_u128 << 100);
    }

    // Tests occupied cells are the set bits of the row
    // Verified by counting zero bits
    #[test]
    fn test_occupied() {
        assert_eq!(RowBits::occupied(0_u64), 0);
        assert_eq!(RowBits::occupied(0b1011_u64), 3);
        assert_eq!(RowBits::occupied(u128::MAX), 128);
    }
}

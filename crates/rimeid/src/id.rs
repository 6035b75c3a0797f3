use core::fmt;

/// A 64-bit Snowflake-style ID
///
/// - 42 bits timestamp (ms since [`RIME_EPOCH`])
/// - 10 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21             12 11             0
///              +----------------+-----------------+---------------+
///  Field:      | timestamp (42) | worker ID (10)  | sequence (12) |
///              +----------------+-----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB ----->|
/// ```
///
/// IDs order lexicographically by (timestamp, worker ID, sequence), so IDs
/// from a single worker sort by generation order. The timestamp field keeps
/// bit 63 clear for roughly 69 years past the epoch, so the raw value also
/// fits a positive `i64` for the lifetime of the layout.
///
/// [`RIME_EPOCH`]: crate::RIME_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RimeId {
    id: u64,
}

impl RimeId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 10-bit worker ID field. Occupies bits 12
    /// through 21.
    pub const WORKER_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Largest timestamp the 42-bit field can hold.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest worker ID the 10-bit field can hold (1023).
    pub const MAX_WORKER_ID: u64 = Self::WORKER_ID_MASK;

    /// Largest sequence the 12-bit field can hold (4095).
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Packs the three fields into an ID, masking each to its field width.
    pub const fn from(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | worker_id | sequence,
        }
    }

    /// Packs the three fields into an ID, asserting in debug builds that each
    /// value fits its field.
    pub fn from_components(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, worker_id, sequence)
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the raw packed representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Reinterprets a raw packed value as an ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns true if the sequence field can be incremented without
    /// wrapping.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::MAX_SEQUENCE
    }

    /// Returns a new ID with the sequence incremented.
    pub fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.worker_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with the sequence reset to
    /// zero.
    pub fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.worker_id(), 0)
    }

    /// Returns a new ID with only the timestamp field replaced.
    pub fn with_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.worker_id(), self.sequence())
    }

    /// Returns a new ID with only the worker ID field replaced.
    pub fn with_worker_id(&self, worker_id: u64) -> Self {
        Self::from_components(self.timestamp(), worker_id, self.sequence())
    }

    /// Returns the ID as a zero-padded 20-digit string.
    ///
    /// Padded strings compare the same way the raw values do, which makes
    /// them usable as sortable keys in systems that only understand strings.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for RimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for RimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RimeId")
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_and_bounds_round_trip() {
        let ts = RimeId::MAX_TIMESTAMP;
        let wid = RimeId::MAX_WORKER_ID;
        let seq = RimeId::MAX_SEQUENCE;

        let id = RimeId::from(ts, wid, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.worker_id(), wid);
        assert_eq!(id.sequence(), seq);
        assert_eq!(RimeId::from_components(ts, wid, seq), id);
        assert_eq!(RimeId::from_raw(id.to_raw()), id);
    }

    #[test]
    fn layout_covers_all_64_bits() {
        assert_eq!(RimeId::MAX_WORKER_ID, 1023);
        assert_eq!(RimeId::MAX_SEQUENCE, 4095);

        let all_set = RimeId::from(
            RimeId::MAX_TIMESTAMP,
            RimeId::MAX_WORKER_ID,
            RimeId::MAX_SEQUENCE,
        );
        assert_eq!(all_set.to_raw(), u64::MAX);
    }

    #[test]
    fn from_masks_overflowing_fields() {
        let id = RimeId::from(0, RimeId::MAX_WORKER_ID + 1, RimeId::MAX_SEQUENCE + 1);
        assert_eq!(id.worker_id(), 0);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        RimeId::from_components(RimeId::MAX_TIMESTAMP + 1, 0, 0);
    }

    #[test]
    #[should_panic(expected = "worker_id overflow")]
    fn worker_id_overflow_panics() {
        RimeId::from_components(0, RimeId::MAX_WORKER_ID + 1, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        RimeId::from_components(0, 0, RimeId::MAX_SEQUENCE + 1);
    }

    #[test]
    fn orders_by_timestamp_then_worker_then_sequence() {
        let early = RimeId::from(1, RimeId::MAX_WORKER_ID, RimeId::MAX_SEQUENCE);
        let late = RimeId::from(2, 0, 0);
        assert!(early < late);

        let low_seq = RimeId::from(1, 1, 0);
        let high_seq = RimeId::from(1, 1, 1);
        assert!(low_seq < high_seq);
    }

    #[test]
    fn sequence_helpers() {
        let id = RimeId::from(7, 3, 0);
        assert!(id.has_sequence_room());
        assert_eq!(id.increment_sequence().sequence(), 1);
        assert_eq!(id.increment_sequence().timestamp(), 7);
        assert_eq!(id.increment_sequence().worker_id(), 3);

        let exhausted = RimeId::from(7, 3, RimeId::MAX_SEQUENCE);
        assert!(!exhausted.has_sequence_room());

        let rolled = exhausted.rollover_to_timestamp(8);
        assert_eq!(rolled.timestamp(), 8);
        assert_eq!(rolled.worker_id(), 3);
        assert_eq!(rolled.sequence(), 0);
    }

    #[test]
    fn field_rewrites_leave_other_fields_alone() {
        let id = RimeId::from(100, 5, 9);

        let moved = id.with_timestamp(200);
        assert_eq!(moved.timestamp(), 200);
        assert_eq!(moved.worker_id(), 5);
        assert_eq!(moved.sequence(), 9);

        let relabeled = id.with_worker_id(1023);
        assert_eq!(relabeled.timestamp(), 100);
        assert_eq!(relabeled.worker_id(), 1023);
        assert_eq!(relabeled.sequence(), 9);
    }

    #[test]
    fn positive_as_i64_within_timestamp_horizon() {
        // Bit 63 is timestamp bit 41; any timestamp below 2^41 keeps the raw
        // value positive as a signed 64-bit integer.
        let id = RimeId::from((1 << 41) - 1, RimeId::MAX_WORKER_ID, RimeId::MAX_SEQUENCE);
        let signed = i64::try_from(id.to_raw()).expect("fits i64");
        assert!(signed > 0);
    }

    #[test]
    fn padded_string_is_20_digits_and_sorts() {
        let small = RimeId::from(1, 0, 1);
        let large = RimeId::from(2, 0, 0);
        assert_eq!(small.to_padded_string().len(), 20);
        assert_eq!(large.to_padded_string().len(), 20);
        assert!(small.to_padded_string() < large.to_padded_string());
    }

    #[test]
    fn display_and_debug() {
        let id = RimeId::from(42, 7, 3);
        assert_eq!(format!("{id}"), id.to_raw().to_string());
        let dbg = format!("{id:?}");
        assert!(dbg.contains("timestamp: 42"));
        assert!(dbg.contains("worker_id: 7"));
        assert!(dbg.contains("sequence: 3"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let id = RimeId::from(42, 7, 3);
        let json = serde_json::to_string(&id).expect("serialize");
        let back: RimeId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, back);
    }
}

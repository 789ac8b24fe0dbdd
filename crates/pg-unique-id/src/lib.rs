use pgrx::{
    callconv::ArgAbi,
    datum::{FromDatum, IntoDatum},
    pg_sys,
    pgrx_sql_entity_graph::metadata::{
        ArgumentError, Returns, ReturnsError, SqlMapping, SqlTranslatable,
    },
    prelude::*,
};
use unique_id::{FormatPolicy, Instagram, PackedId, SequenceSource, Sonyflake, TimeSource};

pgrx::pg_module_magic!();

/// Microseconds between the Unix epoch and the PostgreSQL epoch (2000-01-01).
const PG_EPOCH_OFFSET_MICROS: i64 = 946_684_800_000_000;

// ============================================================================
// REGCLASS ARGUMENT
// ============================================================================

/// A `regclass` argument naming the sequence to draw from.
///
/// Accepting `regclass` rather than `oid` lets callers pass the sequence name
/// as a plain string literal, which PostgreSQL resolves to the relation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct RegClass(pg_sys::Oid);

impl RegClass {
    pub const fn oid(self) -> pg_sys::Oid {
        self.0
    }
}

impl FromDatum for RegClass {
    unsafe fn from_polymorphic_datum(
        datum: pg_sys::Datum,
        is_null: bool,
        typoid: pg_sys::Oid,
    ) -> Option<Self> {
        // SAFETY: `regclass` is binary-compatible with `oid`; the caller
        // guarantees `datum` holds one when `is_null` is false.
        unsafe { pg_sys::Oid::from_polymorphic_datum(datum, is_null, typoid) }.map(Self)
    }
}

impl IntoDatum for RegClass {
    fn into_datum(self) -> Option<pg_sys::Datum> {
        self.0.into_datum()
    }

    fn type_oid() -> pg_sys::Oid {
        pg_sys::REGCLASSOID
    }
}

unsafe impl<'fcx> ArgAbi<'fcx> for RegClass
where
    Self: 'fcx,
{
    unsafe fn unbox_arg_unchecked(arg: ::pgrx::callconv::Arg<'_, 'fcx>) -> Self {
        unsafe {
            arg.unbox_arg_using_from_datum()
                .unwrap_or_else(|| pgrx::error!("sequence argument must not be NULL"))
        }
    }
}

unsafe impl SqlTranslatable for RegClass {
    fn argument_sql() -> Result<SqlMapping, ArgumentError> {
        Ok(SqlMapping::As("regclass".into()))
    }
    fn return_sql() -> Result<Returns, ReturnsError> {
        Ok(Returns::One(SqlMapping::As("regclass".into())))
    }
}

// ============================================================================
// CLOCK + SEQUENCE
// ============================================================================

/// Reads `GetCurrentTimestamp()`, the wall clock at call time rather than the
/// transaction start, as milliseconds since the Unix epoch.
struct PgClock;

impl TimeSource<u64> for PgClock {
    fn current_millis(&self) -> u64 {
        // SAFETY: reads the system clock; no shared backend state is touched.
        let micros = unsafe { pg_sys::GetCurrentTimestamp() };
        pg_micros_to_unix_millis(micros)
    }
}

/// Converts a PostgreSQL `TimestampTz` to milliseconds since the Unix epoch.
/// Instants before 1970 clamp to zero and are rejected later as being before
/// the format epoch.
fn pg_micros_to_unix_millis(micros: i64) -> u64 {
    micros
        .saturating_add(PG_EPOCH_OFFSET_MICROS)
        .div_euclid(1_000)
        .max(0) as u64
}

/// Draws from a PostgreSQL sequence and wraps the value into the sequence
/// field of format `P`.
struct PgSequence<P> {
    relid: pg_sys::Oid,
    _policy: core::marker::PhantomData<P>,
}

impl<P: FormatPolicy> PgSequence<P> {
    fn new(relid: pg_sys::Oid) -> Self {
        Self {
            relid,
            _policy: core::marker::PhantomData,
        }
    }
}

impl<P: FormatPolicy> SequenceSource for PgSequence<P> {
    fn next_value(&self) -> i64 {
        let value = Spi::get_one_with_args::<i64>("SELECT nextval($1)", &[self.relid.into()])
            .unwrap_or_else(|e| pgrx::error!("nextval failed: {}", e))
            .unwrap_or_else(|| pgrx::error!("nextval returned NULL"));
        value.rem_euclid(<P::Id as PackedId>::max_sequence() + 1)
    }
}

fn generate<P: FormatPolicy>(seq: RegClass, shard_id: i32) -> i64 {
    P::generate(&PgClock, &PgSequence::<P>::new(seq.oid()), i64::from(shard_id))
        .map(|id| id.to_raw())
        .unwrap_or_else(|e| pgrx::error!("{}: {}", P::NAME, e))
}

// ============================================================================
// GENERATION
// ============================================================================

/// Instagram sharding ID: 41-bit milliseconds since 2011-08-24 21:07:01.721
/// UTC, 13-bit shard ID, 10-bit sequence.
#[pg_extern(strict, parallel_unsafe)]
fn unique_id_instagram(seq: RegClass, shard_id: i32) -> i64 {
    generate::<Instagram>(seq, shard_id)
}

/// Sonyflake ID: 39-bit milliseconds since 2014-09-01 UTC, 8-bit sequence,
/// 16-bit shard (machine) ID.
#[pg_extern(strict, parallel_unsafe)]
fn unique_id_sonyflake(seq: RegClass, shard_id: i32) -> i64 {
    generate::<Sonyflake>(seq, shard_id)
}

extension_sql!(
    r#"
COMMENT ON FUNCTION unique_id_instagram(regclass, integer) IS 'Generate a 64-bit Instagram sharding ID from a sequence and shard ID';
COMMENT ON FUNCTION unique_id_sonyflake(regclass, integer) IS 'Generate a 63-bit Sonyflake ID from a sequence and shard ID';
"#,
    name = "add_comments",
    requires = [unique_id_instagram, unique_id_sonyflake]
);

// ============================================================================
// TESTS
// ============================================================================

#[cfg(any(test, feature = "pg_test"))]
#[pg_schema]
mod tests {
    use super::*;
    use unique_id::{InstagramId, SonyflakeId};

    fn now_unix_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64
    }

    fn instagram(sql: &str) -> InstagramId {
        InstagramId::from_raw(Spi::get_one::<i64>(sql).unwrap().unwrap())
    }

    fn sonyflake(sql: &str) -> SonyflakeId {
        SonyflakeId::from_raw(Spi::get_one::<i64>(sql).unwrap().unwrap())
    }

    #[pg_test]
    fn pg_epoch_converts_to_unix_millis() {
        assert_eq!(pg_micros_to_unix_millis(0), 946_684_800_000);
        assert_eq!(pg_micros_to_unix_millis(1_999), 946_684_800_001);
        assert_eq!(pg_micros_to_unix_millis(-PG_EPOCH_OFFSET_MICROS), 0);
        assert_eq!(pg_micros_to_unix_millis(i64::MIN), 0);
    }

    #[pg_test]
    fn instagram_packs_shard_and_sequence() {
        Spi::run("CREATE SEQUENCE ig_seq").unwrap();
        let id = instagram("SELECT unique_id_instagram('ig_seq', 5)");

        assert_eq!(id.shard_id(), 5);
        assert_eq!(id.sequence(), 1);

        let millis = Instagram::unix_millis(id.timestamp());
        assert!(millis.abs_diff(now_unix_millis()) < 60_000);
    }

    #[pg_test]
    fn sonyflake_packs_shard_lowest() {
        Spi::run("CREATE SEQUENCE sf_seq").unwrap();
        let id = sonyflake("SELECT unique_id_sonyflake('sf_seq', 65535)");

        assert!(id.to_raw() > 0);
        assert_eq!(id.to_raw() & 0xFFFF, 65_535);
        assert_eq!(id.sequence(), 1);

        let millis = Sonyflake::unix_millis(id.timestamp());
        assert!(millis.abs_diff(now_unix_millis()) < 60_000);
    }

    #[pg_test]
    fn consecutive_ids_increase() {
        Spi::run("CREATE SEQUENCE order_seq").unwrap();
        let ids: Vec<i64> = (0..200)
            .map(|_| {
                Spi::get_one::<i64>("SELECT unique_id_instagram('order_seq', 1)")
                    .unwrap()
                    .unwrap()
            })
            .collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[pg_test]
    fn sequence_wraps_into_its_field() {
        Spi::run("CREATE SEQUENCE wrap_seq START 1023").unwrap();
        let first = instagram("SELECT unique_id_instagram('wrap_seq', 0)");
        let second = instagram("SELECT unique_id_instagram('wrap_seq', 0)");

        assert_eq!(first.sequence(), 1023);
        assert_eq!(second.sequence(), 0);
        assert_eq!(second.shard_id(), 0);
    }

    #[pg_test]
    fn negative_sequence_values_wrap() {
        Spi::run("CREATE SEQUENCE neg_seq INCREMENT -1 START -1").unwrap();
        let id = sonyflake("SELECT unique_id_sonyflake('neg_seq', 2)");
        assert_eq!(id.sequence(), 255);
        assert_eq!(id.shard_id(), 2);
    }

    #[pg_test]
    fn shard_id_out_of_range_keeps_sequence_untouched() {
        Spi::run("CREATE SEQUENCE untouched_seq").unwrap();
        let oid = Spi::get_one::<pg_sys::Oid>("SELECT 'untouched_seq'::regclass::oid")
            .unwrap()
            .unwrap();

        let sequence = PgSequence::<Instagram>::new(oid);
        assert!(Instagram::generate(&PgClock, &sequence, 8192).is_err());

        let id = instagram("SELECT unique_id_instagram('untouched_seq', 0)");
        assert_eq!(id.sequence(), 1);
    }

    #[pg_test(error = "instagram: value 8192 does not fit field 1 (allowed 0..=8191)")]
    fn instagram_rejects_large_shard_id() {
        Spi::run("CREATE SEQUENCE big_shard_seq").unwrap();
        Spi::run("SELECT unique_id_instagram('big_shard_seq', 8192)").unwrap();
    }

    #[pg_test(error = "sonyflake: value -1 does not fit field 2 (allowed 0..=65535)")]
    fn sonyflake_rejects_negative_shard_id() {
        Spi::run("CREATE SEQUENCE neg_shard_seq").unwrap();
        Spi::run("SELECT unique_id_sonyflake('neg_shard_seq', -1)").unwrap();
    }

    #[pg_test]
    fn functions_take_regclass() {
        let args = Spi::get_one::<String>(
            "SELECT pg_get_function_identity_arguments('unique_id_instagram'::regproc)",
        )
        .unwrap()
        .unwrap();
        assert_eq!(args, "seq regclass, shard_id integer");
    }

    #[pg_test]
    fn null_arguments_return_null() {
        let id = Spi::get_one::<i64>("SELECT unique_id_instagram(NULL, 1)").unwrap();
        assert_eq!(id, None);
    }
}

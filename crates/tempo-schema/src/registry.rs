//! # Schema Registry
//!
//! [`TemporalSchemas`] is the public entry point. Construction runs the
//! startup capability check, then synthesizes all eight extensions once.
//! The factories (`plain_date()`, `duration()`, ...) hand out fresh
//! schemas that share those extensions and the injected clock.
//!
//! ## Thread Safety
//!
//! `TemporalSchemas` and every [`Schema`] it produces are `Send + Sync`.
//! Nothing mutates after construction; the clock is read per call.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tempo_core::{
    capability, CapabilityError, Clock, Duration, Instant, Kind, PlainDate, PlainDateTime,
    PlainMonthDay, PlainTime, PlainYearMonth, SystemClock, Temporal, ZonedDateTime,
};

use crate::extension::Extension;
use crate::kinds::{self, Registered};
use crate::object::ObjectSchema;
use crate::schema::Schema;

/// Metadata about one registered kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub base_code: String,
    /// Whether comparison rules exist.
    pub ordered: bool,
    /// Whether `"now"` is accepted as a limit.
    pub supports_now: bool,
    /// Rule names, aliases included.
    pub rules: Vec<&'static str>,
    /// Default templates by code.
    pub messages: BTreeMap<String, String>,
}

impl ExtensionInfo {
    fn of<T: Temporal>(ext: &Extension<T>) -> Self {
        let descriptor = ext.descriptor();
        Self {
            name: ext.name(),
            title: T::KIND.title(),
            base_code: ext.base_code(),
            ordered: descriptor.compare.is_some(),
            supports_now: descriptor.current.is_some(),
            rules: ext.rule_names(),
            messages: ext.messages().clone(),
        }
    }
}

/// The eight schema factories bound to one clock.
#[derive(Debug, Clone)]
pub struct TemporalSchemas {
    clock: Arc<dyn Clock>,
    pub(crate) plain_date: Arc<Extension<PlainDate>>,
    pub(crate) plain_time: Arc<Extension<PlainTime>>,
    pub(crate) plain_date_time: Arc<Extension<PlainDateTime>>,
    pub(crate) zoned_date_time: Arc<Extension<ZonedDateTime>>,
    pub(crate) instant: Arc<Extension<Instant>>,
    pub(crate) duration: Arc<Extension<Duration>>,
    pub(crate) plain_year_month: Arc<Extension<PlainYearMonth>>,
    pub(crate) plain_month_day: Arc<Extension<PlainMonthDay>>,
}

impl TemporalSchemas {
    /// Verify the runtime capabilities against `clock` and build every
    /// extension.
    pub fn new(clock: impl Clock + 'static) -> Result<Self, CapabilityError> {
        Self::with_clock(Arc::new(clock))
    }

    /// Like [`TemporalSchemas::new`] for a clock that is already shared.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Result<Self, CapabilityError> {
        capability::check(clock.as_ref())?;
        let schemas = Self {
            clock,
            plain_date: Arc::new(Extension::synthesize(&kinds::PLAIN_DATE)),
            plain_time: Arc::new(Extension::synthesize(&kinds::PLAIN_TIME)),
            plain_date_time: Arc::new(Extension::synthesize(&kinds::PLAIN_DATE_TIME)),
            zoned_date_time: Arc::new(Extension::synthesize(&kinds::ZONED_DATE_TIME)),
            instant: Arc::new(Extension::synthesize(&kinds::INSTANT)),
            duration: Arc::new(Extension::synthesize(&kinds::DURATION)),
            plain_year_month: Arc::new(Extension::synthesize(&kinds::PLAIN_YEAR_MONTH)),
            plain_month_day: Arc::new(Extension::synthesize(&kinds::PLAIN_MONTH_DAY)),
        };
        tracing::info!(
            kinds = Kind::ALL.len(),
            zone = %schemas.clock.time_zone(),
            "temporal schemas registered"
        );
        Ok(schemas)
    }

    /// Registry on the host clock and zone.
    pub fn system() -> Result<Self, CapabilityError> {
        Self::new(SystemClock::new())
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// A fresh schema for any registered kind.
    pub fn schema<T: Registered>(&self) -> Schema<T> {
        Schema::new(Arc::clone(T::extension(self)), Arc::clone(&self.clock))
    }

    pub fn plain_date(&self) -> Schema<PlainDate> {
        self.schema()
    }

    pub fn plain_time(&self) -> Schema<PlainTime> {
        self.schema()
    }

    pub fn plain_date_time(&self) -> Schema<PlainDateTime> {
        self.schema()
    }

    pub fn zoned_date_time(&self) -> Schema<ZonedDateTime> {
        self.schema()
    }

    pub fn instant(&self) -> Schema<Instant> {
        self.schema()
    }

    pub fn duration(&self) -> Schema<Duration> {
        self.schema()
    }

    pub fn plain_year_month(&self) -> Schema<PlainYearMonth> {
        self.schema()
    }

    pub fn plain_month_day(&self) -> Schema<PlainMonthDay> {
        self.schema()
    }

    /// An empty object schema.
    pub fn object(&self) -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Names of every registered kind, in registry order.
    pub fn kind_names(&self) -> Vec<&'static str> {
        Kind::ALL.iter().map(Kind::name).collect()
    }

    /// Metadata for the kind called `name`.
    pub fn extension(&self, name: &str) -> Option<ExtensionInfo> {
        let info = match Kind::from_name(name)? {
            Kind::PlainDate => ExtensionInfo::of(&self.plain_date),
            Kind::PlainTime => ExtensionInfo::of(&self.plain_time),
            Kind::PlainDateTime => ExtensionInfo::of(&self.plain_date_time),
            Kind::ZonedDateTime => ExtensionInfo::of(&self.zoned_date_time),
            Kind::Instant => ExtensionInfo::of(&self.instant),
            Kind::Duration => ExtensionInfo::of(&self.duration),
            Kind::PlainYearMonth => ExtensionInfo::of(&self.plain_year_month),
            Kind::PlainMonthDay => ExtensionInfo::of(&self.plain_month_day),
        };
        Some(info)
    }
}

// Console core - Channel state, history and selection in one execution context
use crate::application::chart::{self, sparkline, trend_chart};
use crate::application::error::ConsoleError;
use crate::application::gauge::{
    Marker, PRIMARY_DIAL, compact_dial, direction_label, gauge, wind_gauge,
};
use crate::application::history_source::{FetchRequest, HistoryBatch};
use crate::application::indicators;
use crate::application::sample_store::SampleStore;
use crate::application::selection::{Selection, SelectionMachine};
use crate::domain::channel::{Category, Channel};
use crate::domain::console::{
    ConsoleGauges, ConsoleSnapshot, Indicators, ReadingView, TrendView,
};
use crate::domain::geometry::{Plot, TrendChart};
use crate::domain::reading::{DisplayValue, Reading};
use crate::domain::sample::Sample;
use crate::infrastructure::config::ConsoleSettings;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

const COMPACT_DIAL_SIZE: f64 = 95.0;

static ABSENT: Reading = Reading::Absent;

#[derive(Debug, Clone)]
struct LatestState {
    reading: Reading,
    unit: Option<String>,
}

pub struct ConsoleCore {
    channels: Vec<Channel>,
    /// channel id -> entity id
    bindings: HashMap<String, String>,
    /// entity id -> every channel reading from it
    entities: HashMap<String, Vec<String>>,
    latest: HashMap<String, LatestState>,
    store: SampleStore,
    selection: SelectionMachine,
    fallback: String,
    next_generation: u64,
    /// Newest fetch generation applied per channel
    applied: HashMap<String, u64>,
}

impl ConsoleCore {
    pub fn new(
        channels: Vec<Channel>,
        bindings: &HashMap<String, String>,
        settings: &ConsoleSettings,
    ) -> Self {
        let mut channel_bindings = HashMap::new();
        let mut entities: HashMap<String, Vec<String>> = HashMap::new();

        for (channel, entity) in bindings {
            if !channels.iter().any(|c| &c.id == channel) {
                tracing::warn!("Ignoring mapping for unknown channel {} -> {}", channel, entity);
                continue;
            }
            channel_bindings.insert(channel.clone(), entity.clone());
            entities.entry(entity.clone()).or_default().push(channel.clone());
        }
        for shared in entities.values_mut() {
            shared.sort();
        }

        tracing::debug!(
            "Console configured with {} of {} channels mapped",
            channel_bindings.len(),
            channels.len()
        );

        Self {
            channels,
            bindings: channel_bindings,
            entities,
            latest: HashMap::new(),
            store: SampleStore::new(),
            selection: SelectionMachine::new(settings.inactivity_timeout()),
            fallback: settings.fallback.clone(),
            next_generation: 1,
            applied: HashMap::new(),
        }
    }

    fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn is_enabled(&self, channel: &str) -> bool {
        self.bindings.contains_key(channel)
    }

    /// Apply a pushed state. Returns false for entities no channel maps to.
    pub fn update(
        &mut self,
        entity_id: &str,
        raw_state: &str,
        unit: Option<&str>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(channel_ids) = self.entities.get(entity_id).cloned() else {
            tracing::trace!("Ignoring push for unmapped entity {}", entity_id);
            return false;
        };

        let reading = Reading::parse(raw_state);
        let unit = unit.map(str::trim).filter(|u| !u.is_empty()).map(str::to_string);

        for channel_id in channel_ids {
            let keeps_history = self.channel(&channel_id).is_some_and(|c| c.trend);
            if let (true, Some(value)) = (keeps_history, reading.as_number()) {
                self.store.record_current(&channel_id, value, now);
            }
            self.latest.insert(
                channel_id,
                LatestState {
                    reading: reading.clone(),
                    unit: unit.clone(),
                },
            );
        }
        true
    }

    fn reading(&self, channel: &str) -> &Reading {
        self.latest
            .get(channel)
            .map(|state| &state.reading)
            .unwrap_or(&ABSENT)
    }

    pub fn display(&self, channel: &str) -> DisplayValue {
        let Some(info) = self.channel(channel) else {
            return DisplayValue::fallback(&self.fallback, "");
        };

        match self.latest.get(channel).filter(|_| self.is_enabled(channel)) {
            Some(state) => DisplayValue::new(
                state.reading.as_number(),
                state.reading.display(info.decimals, &self.fallback),
                state.unit.clone().unwrap_or_else(|| info.unit.clone()),
            ),
            None => DisplayValue::fallback(&self.fallback, &info.unit),
        }
    }

    pub fn buffer_for(&self, channel: &str) -> &[Sample] {
        self.store.buffer_for(channel)
    }

    fn fetch_request(&mut self, entity_ids: Vec<String>, now: DateTime<Utc>) -> FetchRequest {
        let generation = self.next_generation;
        self.next_generation += 1;
        FetchRequest {
            generation,
            entity_ids,
            start: now - chart::window(),
            end: now,
        }
    }

    /// Bulk refresh covering every mapped channel that keeps history
    pub fn refresh_request(&mut self, now: DateTime<Utc>) -> Option<FetchRequest> {
        let entity_ids: Vec<String> = self
            .channels
            .iter()
            .filter(|c| c.trend)
            .filter_map(|c| self.bindings.get(&c.id).cloned())
            .fold(Vec::new(), |mut ids, entity| {
                if !ids.contains(&entity) {
                    ids.push(entity);
                }
                ids
            });

        if entity_ids.is_empty() {
            return None;
        }
        Some(self.fetch_request(entity_ids, now))
    }

    /// Open a channel's trend view. Returns the fetch to run, if any.
    pub fn select(
        &mut self,
        channel: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<FetchRequest>, ConsoleError> {
        let info = self
            .channel(channel)
            .ok_or_else(|| ConsoleError::UnknownChannel(channel.to_string()))?;
        if !info.trend {
            return Err(ConsoleError::NoHistory(channel.to_string()));
        }
        let entity = self
            .bindings
            .get(channel)
            .cloned()
            .ok_or_else(|| ConsoleError::ChannelDisabled(channel.to_string()))?;

        let outcome = self.selection.select(channel, now);
        tracing::debug!("Selected {} ({:?})", channel, outcome);

        Ok(outcome
            .needs_fetch()
            .then(|| self.fetch_request(vec![entity], now)))
    }

    pub fn interact(&mut self, now: DateTime<Utc>) -> bool {
        self.selection.interact(now)
    }

    pub fn close(&mut self) -> bool {
        self.selection.close()
    }

    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        self.selection.expire(now)
    }

    pub fn open_channel(&self) -> Option<&str> {
        self.selection.open_channel()
    }

    pub fn selection_deadline(&self) -> Option<DateTime<Utc>> {
        self.selection.deadline()
    }

    /// Apply a completed bulk fetch. Results older than what a channel already
    /// holds are dropped. Returns how many channels were replaced.
    pub fn apply_history(&mut self, generation: u64, batch: HistoryBatch) -> usize {
        let mut replaced = 0;

        for (entity, points) in batch {
            let Some(channels) = self.entities.get(&entity).cloned() else {
                tracing::debug!("History for unmapped entity {} ignored", entity);
                continue;
            };

            for channel in channels {
                let applied = self.applied.entry(channel.clone()).or_insert(0);
                if *applied >= generation {
                    tracing::debug!(
                        "Dropping stale history for {} (generation {} <= {})",
                        channel,
                        generation,
                        applied
                    );
                    continue;
                }
                *applied = generation;

                let kept = self.store.merge_bulk(&channel, points.clone());
                tracing::debug!("Replaced {} history with {} samples", channel, kept);
                replaced += 1;
            }
        }

        replaced
    }

    pub fn trend(&self, channel: &str, now: DateTime<Utc>) -> Result<Plot<TrendChart>, ConsoleError> {
        let info = self
            .channel(channel)
            .ok_or_else(|| ConsoleError::UnknownChannel(channel.to_string()))?;
        if !info.trend {
            return Err(ConsoleError::NoHistory(channel.to_string()));
        }

        let unit = self.display(channel).unit;
        Ok(trend_chart(self.buffer_for(channel), now, &info.label, &unit))
    }

    fn gauges(&self) -> ConsoleGauges {
        let mut markers = Vec::new();
        let high = self.display("outdoor_temp_high");
        if !high.is_fallback(&self.fallback) {
            markers.push(Marker::High(high.text));
        }
        let low = self.display("outdoor_temp_low");
        if !low.is_fallback(&self.fallback) {
            markers.push(Marker::Low(low.text));
        }

        let degrees = self.display("wind_direction_degrees").value;
        let direction = direction_label(self.reading("wind_direction"), degrees, &self.fallback);

        ConsoleGauges {
            outdoor_temp: gauge(
                Category::Temperature,
                &self.display("outdoor_temp"),
                &markers,
                &PRIMARY_DIAL,
            ),
            indoor_temp: gauge(
                Category::Temperature,
                &self.display("indoor_temp"),
                &[],
                &compact_dial(COMPACT_DIAL_SIZE),
            ),
            indoor_humidity: gauge(
                Category::Humidity,
                &self.display("indoor_humidity"),
                &[],
                &compact_dial(COMPACT_DIAL_SIZE),
            ),
            wind: wind_gauge(
                &self.display("wind_speed"),
                &self.display("wind_gust"),
                degrees,
                &direction,
            ),
        }
    }

    fn indicators(&self, now: DateTime<Utc>) -> Indicators {
        let trend = self
            .is_enabled("pressure_trend")
            .then(|| self.reading("pressure_trend"));

        Indicators {
            pressure_arrow: indicators::pressure_arrow(trend),
            weather_icon: indicators::weather_icon(self.display("pressure_abs").value),
            rain_drops: indicators::rain_drops(self.display("rain_daily").value),
            moon: indicators::moon_phase(now),
            lightning: indicators::lightning(
                &self.display("lightning_distance"),
                &self.display("lightning_count"),
                &self.display("lightning_time"),
                &self.fallback,
            ),
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> ConsoleSnapshot {
        let readings = self
            .channels
            .iter()
            .map(|channel| {
                let value = self.display(&channel.id);
                let enabled = self.is_enabled(&channel.id);
                ReadingView {
                    channel: channel.id.clone(),
                    label: channel.label.clone(),
                    text: value.text,
                    unit: value.unit,
                    enabled,
                    selectable: enabled && channel.trend,
                }
            })
            .collect();

        let sparklines: BTreeMap<_, _> = self
            .channels
            .iter()
            .filter(|c| c.trend && self.is_enabled(&c.id))
            .map(|c| (c.id.clone(), sparkline(self.buffer_for(&c.id), now)))
            .collect();

        let trend = match self.selection.state() {
            Selection::Open {
                channel, closes_at, ..
            } => self.trend(channel, now).ok().map(|chart| TrendView {
                channel: channel.clone(),
                closes_at: *closes_at,
                chart,
            }),
            Selection::Closed => None,
        };

        ConsoleSnapshot {
            generated_at: now,
            readings,
            gauges: self.gauges(),
            indicators: self.indicators(now),
            sparklines,
            trend,
        }
    }
}

//! Time zone data read from TZif files.
//!
//! `TZif` stands for Time zone information format and is laid out by
//! [RFC 8536][rfc8536] and the [tzdata manual][tzif-manual]. Parsing is done
//! by the `tzif` [rust crate][tzif-crate]. This module keeps the version 2+
//! data block as a table of transitions and evaluates the footer's POSIX TZ
//! rule for instants after the last recorded transition.
//!
//! [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536
//! [tzif-manual]: https://man7.org/linux/man-pages/man5/tzfile.5.html
//! [tzif-crate]: https://docs.rs/tzif/latest/tzif/

use alloc::vec::Vec;

use combine::Parser;
use tzif::data::tzif::{DataBlock, LocalTimeTypeRecord, TzifData};

use crate::{
    epoch_nanoseconds::EpochNanoseconds,
    posix::PosixTimeZone,
    provider::{
        CandidateEpochNanoseconds, TimeZoneProviderResult, TimeZoneTransitionInfo,
        TransitionDirection, UtcOffsetSeconds,
    },
    utils, TimeZoneProviderError,
};

impl From<LocalTimeTypeRecord> for UtcOffsetSeconds {
    fn from(value: LocalTimeTypeRecord) -> Self {
        Self(value.utoff.0)
    }
}

/// The offset history of a single zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tzif {
    /// Transition instants in epoch seconds, ascending.
    transitions: Vec<i64>,
    /// The offset in effect from the transition at the same index onward.
    offsets: Vec<UtcOffsetSeconds>,
    /// Local time type 0, in effect before the first transition.
    initial_offset: UtcOffsetSeconds,
    /// The rule in effect after the last transition.
    footer: Option<PosixTimeZone>,
}

impl Tzif {
    /// Parses the bytes of a TZif file.
    pub fn from_bytes(data: &[u8]) -> TimeZoneProviderResult<Self> {
        let Ok((parsed, _)) = tzif::parse::tzif::tzif().parse(data) else {
            return Err(TimeZoneProviderError::Range("Illformed TZif data."));
        };
        let TzifData {
            data_block2,
            footer,
            ..
        } = parsed;
        let block = data_block2.ok_or(TimeZoneProviderError::Range(
            "Only TZif v2+ is supported.",
        ))?;

        // The footer is the last newline enclosed line of the file. An empty
        // footer means there is no rule past the last transition.
        let footer = match footer.and_then(|_| footer_str(data)) {
            Some(rule) if !rule.is_empty() => Some(PosixTimeZone::parse(rule)?),
            _ => None,
        };
        Self::from_data_block(&block, footer)
    }

    fn from_data_block(
        block: &DataBlock,
        footer: Option<PosixTimeZone>,
    ) -> TimeZoneProviderResult<Self> {
        let record = |idx: usize| {
            block
                .local_time_type_records
                .get(idx)
                .copied()
                .map(UtcOffsetSeconds::from)
                .ok_or(TimeZoneProviderError::Range(
                    "TZif transition type is out of range.",
                ))
        };
        let initial_offset = record(0)?;
        let transitions = block.transition_times.iter().map(|t| t.0).collect();
        let offsets = block
            .transition_types
            .iter()
            .map(|idx| record(*idx))
            .collect::<TimeZoneProviderResult<Vec<_>>>()?;
        Ok(Self {
            transitions,
            offsets,
            initial_offset,
            footer,
        })
    }

    /// Returns the number of recorded transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Resolves the offset in effect at `epoch_seconds`.
    pub fn resolve_for_epoch_seconds(&self, epoch_seconds: i64) -> TimeZoneTransitionInfo {
        let idx = self.transitions.partition_point(|t| *t <= epoch_seconds);
        match (idx, &self.footer) {
            // <https://datatracker.ietf.org/doc/html/rfc8536#section-3.2>
            // If there are no transitions, local time for all timestamps is specified by the TZ
            // string in the footer if present and nonempty; otherwise, it is
            // specified by time type 0.
            (0, Some(footer)) if self.transitions.is_empty() => {
                footer.resolve_for_epoch_seconds(epoch_seconds)
            }
            (0, _) => TimeZoneTransitionInfo {
                transition_epoch: None,
                offset: self.initial_offset,
            },
            (idx, Some(footer)) if idx == self.transitions.len() => {
                let last = self.transitions[idx - 1];
                let mut info = footer.resolve_for_epoch_seconds(epoch_seconds);
                // Rule transitions before the last recorded one never happened.
                if info.transition_epoch.is_none_or(|t| t < last) {
                    info.transition_epoch = Some(last);
                }
                info
            }
            (idx, _) => TimeZoneTransitionInfo {
                transition_epoch: Some(self.transitions[idx - 1]),
                offset: self.offsets[idx - 1],
            },
        }
    }

    /// Returns every epoch nanosecond value that reads as `local_nanoseconds`
    /// (the local date and time measured as if it were UTC).
    ///
    /// The offsets a day on either side of the local time are the only
    /// candidates; no zone transitions twice within two days.
    pub fn candidate_epoch_nanoseconds(&self, local_nanoseconds: i128) -> CandidateEpochNanoseconds {
        let local_seconds = EpochNanoseconds(local_nanoseconds).floor_seconds();
        let before = self
            .resolve_for_epoch_seconds(local_seconds - utils::SECONDS_PER_DAY)
            .offset;
        let after = self
            .resolve_for_epoch_seconds(local_seconds + utils::SECONDS_PER_DAY)
            .offset;

        let mut candidates = [None; 2];
        for (slot, offset) in candidates.iter_mut().zip([before, after]) {
            let epoch = EpochNanoseconds(local_nanoseconds - offset.as_nanoseconds());
            if self.resolve_for_epoch_seconds(epoch.floor_seconds()).offset == offset {
                *slot = Some(epoch);
            }
        }

        match candidates {
            [Some(a), Some(b)] if a == b => CandidateEpochNanoseconds::One(a),
            [Some(a), Some(b)] => CandidateEpochNanoseconds::Two([a.min(b), a.max(b)]),
            [Some(one), None] | [None, Some(one)] => CandidateEpochNanoseconds::One(one),
            [None, None] => CandidateEpochNanoseconds::Zero,
        }
    }

    /// Whether the recorded transition at `idx` changes the UTC offset.
    ///
    /// TZif also records transitions that only change the abbreviation or
    /// the daylight saving flag.
    fn changes_offset(&self, idx: usize) -> bool {
        let before = match idx {
            0 => self.initial_offset,
            idx => self.offsets[idx - 1],
        };
        self.offsets[idx] != before
    }

    /// Returns the closest transition that changes the offset, strictly
    /// after (or before) `epoch_seconds`.
    pub fn transition(&self, epoch_seconds: i64, direction: TransitionDirection) -> Option<i64> {
        let last = self.transitions.last().copied();
        match direction {
            TransitionDirection::Next => {
                let start = self.transitions.partition_point(|t| *t <= epoch_seconds);
                if let Some(idx) = (start..self.transitions.len()).find(|i| self.changes_offset(*i))
                {
                    return Some(self.transitions[idx]);
                }
                let from = last.map_or(epoch_seconds, |last| epoch_seconds.max(last));
                self.footer.as_ref()?.transition(from, direction)
            }
            TransitionDirection::Previous => {
                let end = self.transitions.partition_point(|t| *t < epoch_seconds);
                if end == self.transitions.len() {
                    let from_footer = self
                        .footer
                        .as_ref()
                        .and_then(|footer| footer.transition(epoch_seconds, direction))
                        .filter(|t| last.is_none_or(|last| *t > last));
                    if from_footer.is_some() {
                        return from_footer;
                    }
                }
                (0..end)
                    .rev()
                    .find(|i| self.changes_offset(*i))
                    .map(|idx| self.transitions[idx])
            }
        }
    }
}

/// Returns the footer line of a TZif file, which is enclosed by the last two
/// newlines of the file.
fn footer_str(data: &[u8]) -> Option<&str> {
    let body = data.strip_suffix(b"\n")?;
    let start = body.iter().rposition(|b| *b == b'\n')? + 1;
    core::str::from_utf8(&body[start..]).ok()
}

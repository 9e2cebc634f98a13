//! Message kinds and control item codes.
//!
//! The kind occupies the top 3 bits of every header. Kinds ordered before
//! [`MessageKind::DataItem0`] are control-plane messages and carry an item
//! code; the rest are data-plane messages and carry a sequence number.

use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// The 3-bit message type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    /// Set a control item on the receiver.
    SetControlItem,
    /// Request or report the current value of a control item.
    CurrentControlItem,
    /// Request or report the valid range of a control item.
    ControlItemRange,
    /// Acknowledge a data item.
    Ack,
    /// Data item stream 0 (I/Q sample data).
    DataItem0,
    /// Data item stream 1.
    DataItem1,
    /// Data item stream 2.
    DataItem2,
    /// Data item stream 3.
    DataItem3,
}

impl MessageKind {
    /// Every kind, indexed by its wire ordinal.
    pub const ALL: [MessageKind; 8] = [
        MessageKind::SetControlItem,
        MessageKind::CurrentControlItem,
        MessageKind::ControlItemRange,
        MessageKind::Ack,
        MessageKind::DataItem0,
        MessageKind::DataItem1,
        MessageKind::DataItem2,
        MessageKind::DataItem3,
    ];

    /// The 3-bit value written into the header.
    pub fn ordinal(self) -> u8 {
        // ALL is exhaustive, so the search always hits.
        Self::ALL.iter().position(|k| *k == self).unwrap_or_default() as u8
    }

    /// Look up a kind by its 3-bit value. Only the low 3 bits are used.
    pub fn from_ordinal(ordinal: u8) -> Self {
        Self::ALL[usize::from(ordinal & 0x07)]
    }

    /// Returns true for kinds that carry a sequence number instead of an item code.
    pub fn is_data_plane(self) -> bool {
        self.ordinal() >= MessageKind::DataItem0.ordinal()
    }

    /// Returns true for kinds that carry an item code.
    pub fn is_control_plane(self) -> bool {
        !self.is_data_plane()
    }

    /// Kebab-case name used on the command line and in output.
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::SetControlItem => "set-control-item",
            MessageKind::CurrentControlItem => "current-control-item",
            MessageKind::ControlItemRange => "control-item-range",
            MessageKind::Ack => "ack",
            MessageKind::DataItem0 => "data-item0",
            MessageKind::DataItem1 => "data-item1",
            MessageKind::DataItem2 => "data-item2",
            MessageKind::DataItem3 => "data-item3",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MessageKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CodecError::UnknownName(s.to_string()))
    }
}

/// Recognized control item codes.
///
/// The "no item code" sentinel (wire value 0) is `Option::<ItemCode>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCode {
    /// Start/stop the receiver.
    ReceiverState,
    /// Receiver NCO frequency.
    ReceiverFrequency,
    /// RF filter selection.
    RfFilter,
    /// A/D converter modes (dither, gain).
    AdModes,
    /// I/Q output data sample rate.
    IqOutputSampleRate,
}

impl ItemCode {
    pub const ALL: [ItemCode; 5] = [
        ItemCode::ReceiverState,
        ItemCode::ReceiverFrequency,
        ItemCode::RfFilter,
        ItemCode::AdModes,
        ItemCode::IqOutputSampleRate,
    ];

    /// The 16-bit value written little-endian after the header.
    pub fn value(self) -> u16 {
        match self {
            ItemCode::ReceiverState => 0x0018,
            ItemCode::ReceiverFrequency => 0x0020,
            ItemCode::RfFilter => 0x0044,
            ItemCode::AdModes => 0x008A,
            ItemCode::IqOutputSampleRate => 0x00B8,
        }
    }

    /// Look up a recognized code. Returns `None` for 0 and for unknown values.
    pub fn from_value(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.value() == value)
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemCode::ReceiverState => "receiver-state",
            ItemCode::ReceiverFrequency => "receiver-frequency",
            ItemCode::RfFilter => "rf-filter",
            ItemCode::AdModes => "ad-modes",
            ItemCode::IqOutputSampleRate => "iq-output-sample-rate",
        }
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemCode {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CodecError::UnknownName(s.to_string()))
    }
}

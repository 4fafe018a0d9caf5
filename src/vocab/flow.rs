// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Flow provenance schema vocabulary.

use super::named_node;

pub const NS_BASE: &str = "http://flow.ai/schema/";
pub const NS_PREFERRED_PREFIX: &str = "flow";

named_node!(VIDEO, NS_BASE, "Video", "A published video, the entity described by one source row.");
named_node!(DATASET, NS_BASE, "Dataset", "A batch of source rows, loaded from one tabular file.");
named_node!(VIDEO_ID, NS_BASE, "videoId", "The stable identifier of a video on its platform.");
named_node!(TITLE, NS_BASE, "title", "The original title of a video.");
named_node!(DESCRIPTION, NS_BASE, "description", "The original description of a video.");
named_node!(DURATION_MS, NS_BASE, "durationMs", "The approximate duration of a video in milliseconds.");
named_node!(PUBLISH_TIMESTAMP, NS_BASE, "publishTimestamp", "The moment a video was published.");
named_node!(PUBLISH_YEAR, NS_BASE, "publishYear", "The year a video was published.");
named_node!(
    BELONGS_TO_DATASET,
    NS_BASE,
    "belongsToDataset",
    "Links a video to the dataset (batch) it was loaded from."
);

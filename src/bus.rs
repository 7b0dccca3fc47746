// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Zenoh backed publishers.
//!
//! Messages are CDR encoded and tagged with an `application/cdr` encoding
//! carrying the ROS schema name, matching what the EdgeFirst middleware and
//! the ROS2 bridge expect.

use crate::publisher::{Error, Publisher};
use edgefirst_schemas::serde_cdr;
use serde::Serialize;
use std::{
    marker::PhantomData,
    sync::{Arc, Mutex},
};
use tracing::{debug, warn};
use zenoh::{
    bytes::{Encoding, ZBytes},
    qos::{CongestionControl, Priority},
    query::Queryable,
    Session, Wait,
};

fn encode<T: Serialize>(msg: &T) -> Result<ZBytes, Error> {
    let bytes = serde_cdr::serialize(msg).map_err(|e| Error::Serialize(e.to_string()))?;
    Ok(ZBytes::from(bytes))
}

/// Publisher for a streaming topic.
///
/// Samples are dropped rather than queued under congestion so that a slow
/// subscriber never stalls the acquisition loop.
pub struct ZenohPublisher<T> {
    publisher: zenoh::pubsub::Publisher<'static>,
    encoding: Encoding,
    _msg: PhantomData<fn(&T)>,
}

impl<T> ZenohPublisher<T> {
    /// Declares a publisher on `topic` for messages of `schema`.
    pub fn declare(session: &Session, topic: &str, schema: &str) -> Result<Self, Error> {
        let publisher = session
            .declare_publisher(topic.to_string())
            .priority(Priority::DataHigh)
            .congestion_control(CongestionControl::Drop)
            .wait()?;
        debug!("declared publisher {} ({})", topic, schema);

        Ok(ZenohPublisher {
            publisher,
            encoding: Encoding::APPLICATION_CDR.with_schema(schema),
            _msg: PhantomData,
        })
    }
}

impl<T: Serialize> Publisher<T> for ZenohPublisher<T> {
    fn publish(&self, msg: &T) -> Result<(), Error> {
        self.publisher
            .put(encode(msg)?)
            .encoding(self.encoding.clone())
            .wait()?;
        Ok(())
    }
}

/// Publisher whose last sample stays available to late joiners.
///
/// The sample is put once and additionally served by a queryable on the same
/// key, so a subscriber starting later can fetch it with a get on the topic.
pub struct LatchedPublisher<T> {
    publisher: zenoh::pubsub::Publisher<'static>,
    encoding: Encoding,
    retained: Arc<Mutex<Option<ZBytes>>>,
    _queryable: Queryable<()>,
    _msg: PhantomData<fn(&T)>,
}

impl<T> LatchedPublisher<T> {
    /// Declares the publisher and its queryable on `topic`.
    pub fn declare(session: &Session, topic: &str, schema: &str) -> Result<Self, Error> {
        let encoding = Encoding::APPLICATION_CDR.with_schema(schema);
        let retained: Arc<Mutex<Option<ZBytes>>> = Arc::new(Mutex::new(None));

        let publisher = session
            .declare_publisher(topic.to_string())
            .priority(Priority::DataHigh)
            .congestion_control(CongestionControl::Block)
            .wait()?;

        let reply_topic = topic.to_string();
        let reply_encoding = encoding.clone();
        let reply_sample = retained.clone();
        let queryable = session
            .declare_queryable(topic.to_string())
            .callback(move |query| {
                let sample = match reply_sample.lock() {
                    Ok(sample) => sample.clone(),
                    Err(_) => None,
                };
                if let Some(sample) = sample {
                    if let Err(e) = query
                        .reply(reply_topic.clone(), sample)
                        .encoding(reply_encoding.clone())
                        .wait()
                    {
                        warn!("{} latched reply error: {:?}", reply_topic, e);
                    }
                }
            })
            .wait()?;
        debug!("declared latched publisher {} ({})", topic, schema);

        Ok(LatchedPublisher {
            publisher,
            encoding,
            retained,
            _queryable: queryable,
            _msg: PhantomData,
        })
    }
}

impl<T: Serialize> Publisher<T> for LatchedPublisher<T> {
    fn publish(&self, msg: &T) -> Result<(), Error> {
        let sample = encode(msg)?;
        *self.retained.lock().map_err(|_| Error::Poisoned)? = Some(sample.clone());
        self.publisher
            .put(sample)
            .encoding(self.encoding.clone())
            .wait()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::to_stamp, msgs::RadarInfo};
    use std::time::Duration;
    use zenoh::Config;

    fn session() -> Session {
        let mut config = Config::default();
        config
            .insert_json5("scouting/multicast/enabled", "false")
            .unwrap();
        zenoh::open(config).wait().unwrap()
    }

    fn fetch(session: &Session, topic: &str) -> Vec<RadarInfo> {
        let replies = session.get(topic).wait().unwrap();
        let mut received = Vec::new();
        while let Ok(reply) = replies.recv() {
            let sample = reply.result().unwrap();
            let bytes = sample.payload().to_bytes();
            received.push(serde_cdr::deserialize::<RadarInfo>(&bytes).unwrap());
        }
        received
    }

    #[test]
    fn test_latched_late_joiner() {
        let session = session();
        let topic = "test/radar/info";
        let info = LatchedPublisher::<RadarInfo>::declare(&session, topic, RadarInfo::SCHEMA)
            .unwrap();
        assert!(fetch(&session, topic).is_empty());

        info.publish(&RadarInfo::o79("radar", to_stamp(Duration::from_secs(3))))
            .unwrap();

        let received = fetch(&session, topic);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].header.frame_id, "radar");
        assert_eq!(received[0].header.stamp.sec, 3);
        assert_eq!(received[0].update_rate, crate::msgs::o79::UPDATE_RATE);

        // Served again without a republish.
        assert_eq!(fetch(&session, topic).len(), 1);
    }
}

//! Container/codec decoding via symphonia.
//!
//! Decoded audio stays at its native sample rate.

use crate::{AudioBuffer, Error, Result};
use std::io::{Cursor, ErrorKind};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode encoded audio bytes (WAV, FLAC, MP3, OGG/Vorbis) into a planar buffer.
///
/// `extension` is an optional file-extension hint for container probing.
pub fn decode_audio(bytes: &[u8], extension: Option<&str>) -> Result<AudioBuffer> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(decode_error)?;
    let mut format = probed.format;

    let (track_id, codec_params) = {
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode("no decodable audio track".into()))?;
        (track.id, track.codec_params.clone())
    };

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(decode_error)?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channel_count = codec_params.channels.map(|c| c.count());
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate.get_or_insert(spec.rate);
                channel_count.get_or_insert(spec.channels.count());

                let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(sample_buf.samples());
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("skipping corrupt packet: {}", msg);
            }
            Err(SymphoniaError::IoError(_)) => continue,
            Err(e) => return Err(decode_error(e)),
        }
    }

    let sample_rate =
        sample_rate.ok_or_else(|| Error::Decode("unknown sample rate".into()))?;
    let channel_count =
        channel_count.ok_or_else(|| Error::Decode("unknown channel layout".into()))?;

    AudioBuffer::from_interleaved(sample_rate, channel_count, &samples)
}

fn decode_error(e: SymphoniaError) -> Error {
    Error::Decode(e.to_string())
}

pub use crate::parquet_bridge::{Compression, CompressionLevel};

use crate::error::{Error, Result};

/// Parquet compression codec interface.
pub trait Codec: std::fmt::Debug {
    /// Compresses `input_buf` and appends the result to `output_buf`.
    fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()>;

    /// Decompresses `input_buf` into `output_buf`, which the caller sizes
    /// to the exact uncompressed length. Producing any other number of
    /// bytes is an error.
    fn decompress(&mut self, input_buf: &[u8], output_buf: &mut [u8]) -> Result<()>;
}

/// Given the compression type `codec`, returns a codec used to compress and
/// decompress bytes for that compression type.
/// This returns `None` if the codec type is `UNCOMPRESSED`.
pub fn create_codec(
    codec: Compression,
    level: CompressionLevel,
) -> Result<Option<Box<dyn Codec>>> {
    let _ = level;
    match codec {
        #[cfg(feature = "brotli")]
        Compression::Brotli => Ok(Some(Box::new(BrotliCodec::new(level)))),
        #[cfg(feature = "gzip")]
        Compression::Gzip => Ok(Some(Box::new(GZipCodec::new(level)))),
        #[cfg(feature = "snappy")]
        Compression::Snappy => Ok(Some(Box::new(SnappyCodec::new()))),
        // LZ4 always maps to the raw block format in practice
        #[cfg(feature = "lz4")]
        Compression::Lz4 | Compression::Lz4Raw => Ok(Some(Box::new(Lz4RawCodec::new()))),
        #[cfg(feature = "zstd")]
        Compression::Zstd => Ok(Some(Box::new(ZstdCodec::new(level)))),
        Compression::Uncompressed => Ok(None),
        _ => Err(Error::UnsupportedCodec(format!(
            "compression {:?} is not compiled into this build",
            codec
        ))),
    }
}

#[cfg(feature = "snappy")]
mod snappy_codec {
    use snap::raw::{decompress_len, max_compress_len, Decoder, Encoder};

    use super::Codec;
    use crate::error::{Error, Result};

    /// Codec for the Snappy raw format.
    #[derive(Debug)]
    pub struct SnappyCodec {
        decoder: Decoder,
        encoder: Encoder,
    }

    impl SnappyCodec {
        pub(crate) fn new() -> Self {
            Self {
                decoder: Decoder::new(),
                encoder: Encoder::new(),
            }
        }
    }

    impl Codec for SnappyCodec {
        fn decompress(&mut self, input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
            let len = decompress_len(input_buf)?;
            if len != output_buf.len() {
                return Err(Error::Decompression(format!(
                    "snappy stream inflates to {} bytes, the page header declares {}",
                    len,
                    output_buf.len()
                )));
            }
            self.decoder
                .decompress(input_buf, output_buf)
                .map_err(|e| e.into())
                .map(|_| ())
        }

        fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
            let output_buf_len = output_buf.len();
            let required_len = max_compress_len(input_buf.len());
            output_buf.resize(output_buf_len + required_len, 0);
            let n = self
                .encoder
                .compress(input_buf, &mut output_buf[output_buf_len..])
                .map_err(|e| Error::Compression(format!("underlying snap error: {}", e)))?;
            output_buf.truncate(output_buf_len + n);
            Ok(())
        }
    }
}
#[cfg(feature = "snappy")]
pub use snappy_codec::*;

#[cfg(feature = "gzip")]
mod gzip_codec {
    use std::io::{Read, Write};

    use flate2::{read, write, Compression as GzLevel};

    use super::Codec;
    use crate::compression::CompressionLevel;
    use crate::error::{Error, Result};

    /// Codec for the GZIP compression algorithm.
    #[derive(Debug)]
    pub struct GZipCodec {
        level: GzLevel,
    }

    impl GZipCodec {
        pub(crate) fn new(level: CompressionLevel) -> Self {
            Self {
                level: level
                    .0
                    .map(|l| GzLevel::new(l.clamp(0, 9) as u32))
                    .unwrap_or_default(),
            }
        }
    }

    impl Codec for GZipCodec {
        fn decompress(&mut self, input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
            let mut decoder = read::GzDecoder::new(input_buf);
            decoder.read_exact(output_buf).map_err(|e| {
                Error::Decompression(format!("underlying gzip error: {}", e))
            })?;
            // the stream must end exactly at the declared size
            let mut trailing = [0u8; 1];
            match decoder.read(&mut trailing) {
                Ok(0) => Ok(()),
                _ => Err(Error::Decompression(
                    "gzip stream inflates past the size the page header declares".into(),
                )),
            }
        }

        fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
            let mut encoder = write::GzEncoder::new(output_buf, self.level);
            encoder
                .write_all(input_buf)
                .and_then(|_| encoder.try_finish())
                .map_err(|e| Error::Compression(format!("underlying gzip error: {}", e)))
        }
    }
}
#[cfg(feature = "gzip")]
pub use gzip_codec::*;

#[cfg(feature = "brotli")]
mod brotli_codec {
    use std::io::{Read, Write};

    use super::Codec;
    use crate::compression::CompressionLevel;
    use crate::error::{Error, Result};

    const BROTLI_DEFAULT_BUFFER_SIZE: usize = 4096;
    const BROTLI_DEFAULT_COMPRESSION_QUALITY: u32 = 1; // supported levels 0-9
    const BROTLI_DEFAULT_LG_WINDOW_SIZE: u32 = 22; // recommended between 20-22

    /// Codec for the Brotli compression algorithm.
    #[derive(Debug)]
    pub struct BrotliCodec {
        quality: u32,
    }

    impl BrotliCodec {
        pub(crate) fn new(level: CompressionLevel) -> Self {
            Self {
                quality: level
                    .0
                    .map(|l| l.clamp(0, 9) as u32)
                    .unwrap_or(BROTLI_DEFAULT_COMPRESSION_QUALITY),
            }
        }
    }

    impl Codec for BrotliCodec {
        fn decompress(&mut self, input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
            brotli::Decompressor::new(input_buf, BROTLI_DEFAULT_BUFFER_SIZE)
                .read_exact(output_buf)
                .map_err(|e| Error::Decompression(format!("underlying brotli error: {}", e)))
        }

        fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
            let mut encoder = brotli::CompressorWriter::new(
                output_buf,
                BROTLI_DEFAULT_BUFFER_SIZE,
                self.quality,
                BROTLI_DEFAULT_LG_WINDOW_SIZE,
            );
            encoder
                .write_all(input_buf)
                .and_then(|_| encoder.flush())
                .map_err(|e| Error::Compression(format!("underlying brotli error: {}", e)))
        }
    }
}
#[cfg(feature = "brotli")]
pub use brotli_codec::*;

#[cfg(feature = "lz4")]
mod lz4_raw_codec {
    use super::Codec;
    use crate::error::{Error, Result};

    /// Codec for the LZ4 raw block format.
    #[derive(Debug)]
    pub struct Lz4RawCodec {}

    impl Lz4RawCodec {
        pub(crate) fn new() -> Self {
            Self {}
        }
    }

    impl Codec for Lz4RawCodec {
        fn decompress(&mut self, input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
            let size = lz4_flex::block::decompress_into(input_buf, output_buf)?;
            if size != output_buf.len() {
                return Err(Error::Decompression(format!(
                    "lz4 block inflates to {} bytes, the page header declares {}",
                    size,
                    output_buf.len()
                )));
            }
            Ok(())
        }

        fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
            let output_buf_len = output_buf.len();
            let required_len = lz4_flex::block::get_maximum_output_size(input_buf.len());
            output_buf.resize(output_buf_len + required_len, 0);
            let size = lz4_flex::block::compress_into(
                input_buf,
                &mut output_buf[output_buf_len..],
            )
            .map_err(|e| Error::Compression(format!("underlying lz4 error: {}", e)))?;
            output_buf.truncate(output_buf_len + size);
            Ok(())
        }
    }
}
#[cfg(feature = "lz4")]
pub use lz4_raw_codec::*;

#[cfg(feature = "zstd")]
mod zstd_codec {
    use std::io::Write;

    use super::Codec;
    use crate::compression::CompressionLevel;
    use crate::error::{Error, Result};

    /// Codec for the Zstandard compression algorithm.
    #[derive(Debug)]
    pub struct ZstdCodec {
        level: i32,
    }

    /// Compression level (1-21) for ZSTD. 1 favors compression speed.
    const ZSTD_DEFAULT_COMPRESSION_LEVEL: i32 = 1;

    impl ZstdCodec {
        pub(crate) fn new(level: CompressionLevel) -> Self {
            Self {
                level: level.0.unwrap_or(ZSTD_DEFAULT_COMPRESSION_LEVEL),
            }
        }
    }

    impl Codec for ZstdCodec {
        fn decompress(&mut self, input_buf: &[u8], output_buf: &mut [u8]) -> Result<()> {
            let size = zstd::bulk::decompress_to_buffer(input_buf, output_buf)
                .map_err(|e| Error::Decompression(format!("underlying zstd error: {}", e)))?;
            if size != output_buf.len() {
                return Err(Error::Decompression(format!(
                    "zstd stream inflates to {} bytes, the page header declares {}",
                    size,
                    output_buf.len()
                )));
            }
            Ok(())
        }

        fn compress(&mut self, input_buf: &[u8], output_buf: &mut Vec<u8>) -> Result<()> {
            let mut encoder = zstd::Encoder::new(output_buf, self.level)
                .map_err(|e| Error::Compression(format!("underlying zstd error: {}", e)))?;
            encoder
                .write_all(input_buf)
                .and_then(|_| encoder.finish().map(|_| ()))
                .map_err(|e| Error::Compression(format!("underlying zstd error: {}", e)))
        }
    }
}
#[cfg(feature = "zstd")]
pub use zstd_codec::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn test_roundtrip(c: Compression, data: &[u8]) {
        let mut c1 = create_codec(c, CompressionLevel::default()).unwrap().unwrap();
        let mut c2 = create_codec(c, CompressionLevel::default()).unwrap().unwrap();

        // Compress with c1
        let mut compressed = Vec::new();
        c1.compress(data, &mut compressed)
            .expect("Error when compressing");

        // Decompress with c2
        let mut decompressed = vec![0; data.len()];
        c2.decompress(compressed.as_slice(), &mut decompressed)
            .expect("Error when decompressing");
        assert_eq!(data, decompressed.as_slice());

        compressed.clear();

        // Compress with c2
        c2.compress(data, &mut compressed)
            .expect("Error when compressing");

        // Decompress with c1
        c1.decompress(compressed.as_slice(), &mut decompressed)
            .expect("Error when decompressing");
        assert_eq!(data, decompressed.as_slice());
    }

    fn test_codec(c: Compression) {
        let sizes = vec![100, 10000, 100000];
        for size in sizes {
            let data = (0..size).map(|x| (x % 255) as u8).collect::<Vec<_>>();
            test_roundtrip(c, &data);
        }
    }

    #[test]
    fn uncompressed_has_no_codec() {
        assert!(create_codec(Compression::Uncompressed, CompressionLevel::default())
            .unwrap()
            .is_none());
    }

    #[cfg(feature = "snappy")]
    #[test]
    fn test_codec_snappy() {
        test_codec(Compression::Snappy);
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn test_codec_gzip() {
        test_codec(Compression::Gzip);
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn test_codec_gzip_high_level() {
        let data = (0..10000).map(|x| (x % 255) as u8).collect::<Vec<_>>();
        let mut codec = create_codec(Compression::Gzip, CompressionLevel::new(9))
            .unwrap()
            .unwrap();
        let mut compressed = vec![];
        codec.compress(&data, &mut compressed).unwrap();
        let mut decompressed = vec![0; data.len()];
        codec.decompress(&compressed, &mut decompressed).unwrap();
        assert_eq!(data, decompressed);
    }

    #[cfg(feature = "brotli")]
    #[test]
    fn test_codec_brotli() {
        test_codec(Compression::Brotli);
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn test_codec_lz4_raw() {
        test_codec(Compression::Lz4Raw);
        test_codec(Compression::Lz4);
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn test_codec_zstd() {
        test_codec(Compression::Zstd);
    }
}

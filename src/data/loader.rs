use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;

use super::model::Shard;
use crate::error::HubError;

// ---------------------------------------------------------------------------
// Parquet shard decoding
// ---------------------------------------------------------------------------

/// Decode one Parquet shard into Arrow record batches.
///
/// Accepts anything the parquet crate can read from: a downloaded response
/// body (`Bytes`) or an open `File`. Schema metadata (including the
/// `huggingface` feature definitions) is preserved.
pub fn read_parquet<R: ChunkReader + 'static>(reader: R) -> Result<Shard, HubError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }

    Ok(Shard { schema, batches })
}

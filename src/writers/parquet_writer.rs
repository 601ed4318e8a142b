use crate::error::{ProcessingError, Result};
use crate::models::{Grid, GridMetadata, Sample};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write a colored grid, one row per sample
    pub fn write_grid(&self, metadata: &GridMetadata, grid: &Grid, path: &Path) -> Result<()> {
        let schema = self.create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in grid.samples.chunks(self.row_group_size.max(1)) {
            let batch = self.samples_to_batch(&metadata.day_label, chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        Ok(())
    }

    /// Create Arrow schema for colored samples
    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("day", DataType::Utf8, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("score", DataType::Int32, false),
            Field::new("color", DataType::Utf8, true),
            Field::new("label", DataType::Utf8, true),
        ];

        Arc::new(Schema::new(fields))
    }

    /// Convert samples to Arrow RecordBatch
    fn samples_to_batch(
        &self,
        day_label: &str,
        samples: &[Sample],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let days: Vec<&str> = vec![day_label; samples.len()];
        let latitudes: Vec<f64> = samples.iter().map(|s| s.latitude).collect();
        let longitudes: Vec<f64> = samples.iter().map(|s| s.longitude).collect();
        let scores: Vec<i32> = samples.iter().map(|s| s.score).collect();
        let colors: Vec<Option<&str>> = samples.iter().map(|s| s.color.as_deref()).collect();
        let labels: Vec<Option<&str>> = samples.iter().map(|s| s.label.as_deref()).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(days)),
            Arc::new(Float64Array::from(latitudes)),
            Arc::new(Float64Array::from(longitudes)),
            Arc::new(Int32Array::from(scores)),
            Arc::new(StringArray::from(colors)),
            Arc::new(StringArray::from(labels)),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
             - Total rows: {}\n\
             - Row groups: {}\n\
             - File size: {:.2} KB\n\
             - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    fn metadata() -> GridMetadata {
        GridMetadata {
            day_label: "Oct  1, 2004".to_string(),
            long_start: -0.5,
            long_stop: 0.5,
            long_step: 1.0,
            long_bins: 2,
            lat_start: 0.0,
            lat_stop: 0.0,
            lat_step: 1.0,
            lat_bins: 1,
        }
    }

    fn grid() -> Grid {
        Grid::new(vec![
            Sample::new(0.0, -0.5, 0).with_coloring("#000000".to_string(), "0".to_string()),
            Sample::new(0.0, 0.5, 310),
        ])
    }

    #[test]
    fn test_write_grid() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("grid.parquet");

        let writer = ParquetWriter::new().with_row_group_size(1);
        writer.write_grid(&metadata(), &grid(), &path)?;

        let info = writer.get_file_info(&path)?;
        assert_eq!(info.total_rows, 2);
        assert_eq!(info.row_groups, 2);
        assert!(info.summary().contains("Total rows: 2"));

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?
            .with_batch_size(1)
            .build()?;
        let batches: Vec<RecordBatch> = reader.collect::<std::result::Result<_, _>>()?;
        let first = &batches[0];
        let colors = first
            .column(4)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(colors.value(0), "#000000");

        let second = &batches[1];
        let scores = second
            .column(3)
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap();
        assert_eq!(scores.value(0), 310);
        assert!(second.column(4).is_null(0));
        Ok(())
    }

    #[test]
    fn test_unsupported_compression() {
        assert!(ParquetWriter::new().with_compression("brotli-ish").is_err());
        assert!(ParquetWriter::new().with_compression("ZSTD").is_ok());
    }
}

pub mod csv_writer;
pub mod parquet_writer;
pub mod png_writer;

pub use csv_writer::CsvWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
pub use png_writer::{parse_hex_color, MapRenderer};

//! File Handlers Module
//!
//! This module loads report files of different types (ZIP, GZIP, XML) into
//! XML document strings, with security checks: file size limits, decompression
//! limits, file count, compression ratio, filename length, and path traversal
//! prevention. A ZIP archive may carry several XML documents; they all belong
//! to the same input file for failure-isolation purposes.

use crate::config::Config;
use crate::error::{AdvisorError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

/// Loads the report at `path` and returns the XML documents it contains.
///
/// # Security Checks
///
/// - Verifies that the original file size does not exceed the maximum.
/// - For ZIP archives: verifies the number of files, checks for path
///   traversal, file name length, compression ratio, and decompressed size.
/// - For GZIP and XML files: checks the decompressed content size.
pub fn load_report<P: AsRef<Path>>(path: P, config: &Config) -> Result<Vec<String>> {
    let file = File::open(&path)?;
    let file_size = file.metadata()?.len();
    if file_size > config.max_file_size as u64 {
        return Err(AdvisorError::FileTooLarge("File too large".to_string()));
    }
    let file_name = path
        .as_ref()
        .file_name()
        .map(|x| x.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = file_name.split('.').last().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "zip" => load_zip(file, config),
        "gz" => load_gzip(file, config),
        "xml" => load_xml(file, config),
        _ => Err(AdvisorError::UnsupportedFile(format!(
            "Unsupported file type: {}",
            file_name
        ))),
    }
}

fn load_zip(file: File, config: &Config) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(file)?;
    if archive.len() > config.max_files_in_zip {
        return Err(AdvisorError::Format("Too many files in archive".to_string()));
    }
    let mut extracted = Vec::new();
    for i in 0..archive.len() {
        let mut file_in_zip = archive.by_index(i)?;
        let inner_name = file_in_zip.name().to_string();
        // Prevent path traversal
        if inner_name.contains("..") || inner_name.starts_with('/') || inner_name.starts_with('\\')
        {
            return Err(AdvisorError::Format(format!(
                "Path traversal attempt detected: {}",
                inner_name
            )));
        }
        if inner_name.len() > config.max_filename_length {
            return Err(AdvisorError::Format("Filename too long".to_string()));
        }
        let compressed_size = file_in_zip.compressed_size();
        let uncompressed_size = file_in_zip.size();
        if compressed_size > 0 {
            let compression_ratio = uncompressed_size as f64 / compressed_size as f64;
            if compression_ratio > config.max_compression_ratio {
                return Err(AdvisorError::Format(format!(
                    "Suspicious compression ratio: {:.2}",
                    compression_ratio
                )));
            }
        }
        if uncompressed_size > config.max_decompressed_size as u64 {
            return Err(AdvisorError::FileTooLarge(
                "Total decompressed size too large".to_string(),
            ));
        }
        let mut contents = String::with_capacity(uncompressed_size as usize);
        file_in_zip.read_to_string(&mut contents)?;
        if contents.trim().is_empty() {
            return Err(AdvisorError::Parse(format!("Empty file in ZIP: {}", inner_name)));
        }
        extracted.push(contents);
    }
    if extracted.is_empty() {
        return Err(AdvisorError::Parse("No files found in ZIP".to_string()));
    }
    Ok(extracted)
}

fn load_gzip(file: File, config: &Config) -> Result<Vec<String>> {
    let mut gz = GzDecoder::new(BufReader::new(file));
    let mut contents = String::new();
    let len = gz.read_to_string(&mut contents)?;
    if len > config.max_decompressed_size {
        return Err(AdvisorError::FileTooLarge(
            "Decompressed size too large".to_string(),
        ));
    }
    if contents.trim().is_empty() {
        return Err(AdvisorError::Parse("Empty GZ file".to_string()));
    }
    Ok(vec![contents])
}

fn load_xml(file: File, config: &Config) -> Result<Vec<String>> {
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    let len = reader.read_to_string(&mut contents)?;
    if len > config.max_file_size {
        return Err(AdvisorError::FileTooLarge(
            "XML file size too large".to_string(),
        ));
    }
    if contents.trim().is_empty() {
        return Err(AdvisorError::Parse("Empty XML file".to_string()));
    }
    Ok(vec![contents])
}

//! Minimal reader for the CPIO "newc" archive format used as the RPM payload
//! container.
//!
//! A newc header is six magic bytes (`070701`) followed by thirteen 8-hex-char
//! fields (110 bytes total), then the entry name (including its terminating
//! NUL) padded so header+name is a multiple of 4 bytes, then the file data
//! padded to a multiple of 4 bytes. The archive ends with a `TRAILER!!!` entry.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 6] = b"070701";
const HEADER_LEN: usize = 110;
const TRAILER_NAME: &str = "TRAILER!!!";
const S_IFMT: u32 = 0o170000;
const S_IFREG: u32 = 0o100000;

/// Walks a newc CPIO stream, extracting only regular-file entries whose
/// normalized name ends in `.jar` into `target_dir`. Returns
/// the paths written, relative names normalized by stripping a leading `./`
/// or `/` so they line up with dirname/filename pairs from the filelist query.
pub fn extract_jars<R: Read>(mut reader: R, target_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut jar_paths = Vec::new();

    loop {
        let mut header = [0u8; HEADER_LEN];
        if !read_exact_or_eof(&mut reader, &mut header)? {
            break;
        }
        if &header[0..6] != MAGIC {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "bad cpio magic"));
        }

        let mode = parse_hex_field(&header, 14)?;
        let filesize = parse_hex_field(&header, 54)? as u64;
        let namesize = parse_hex_field(&header, 94)? as usize;

        let mut name_buf = vec![0u8; namesize];
        reader.read_exact(&mut name_buf)?;
        let name = cstr_to_string(&name_buf);
        skip_padding(&mut reader, HEADER_LEN + namesize)?;

        if name == TRAILER_NAME {
            break;
        }

        let normalized = name.trim_start_matches("./").trim_start_matches('/');
        let is_regular = mode & S_IFMT == S_IFREG;

        if is_regular && normalized.ends_with(".jar") {
            let dest = target_dir.join(normalized);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&dest)?;
            io::copy(&mut (&mut reader).take(filesize), &mut out)?;
            jar_paths.push(dest);
        } else {
            io::copy(&mut (&mut reader).take(filesize), &mut io::sink())?;
        }

        skip_padding(&mut reader, filesize as usize)?;
    }

    Ok(jar_paths)
}

fn parse_hex_field(header: &[u8; HEADER_LEN], start: usize) -> io::Result<u32> {
    let text = std::str::from_utf8(&header[start..start + 8])
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "non-utf8 cpio field"))?;
    u32::from_str_radix(text, 16)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "malformed cpio field"))
}

fn cstr_to_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

fn skip_padding<R: Read>(reader: &mut R, len_so_far: usize) -> io::Result<()> {
    let pad = (4 - (len_so_far % 4)) % 4;
    if pad > 0 {
        let mut buf = [0u8; 3];
        reader.read_exact(&mut buf[..pad])?;
    }
    Ok(())
}

fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut total = 0;
    while total < buf.len() {
        let n = reader.read(&mut buf[total..])?;
        if n == 0 {
            if total == 0 {
                return Ok(false);
            }
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated cpio header"));
        }
        total += n;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn newc_header(mode: u32, filesize: usize, namesize: usize) -> [u8; HEADER_LEN] {
        let mut header = [b'0'; HEADER_LEN];
        header[0..6].copy_from_slice(MAGIC);
        let field = |buf: &mut [u8; HEADER_LEN], start: usize, value: u32| {
            let text = format!("{value:08x}");
            buf[start..start + 8].copy_from_slice(text.as_bytes());
        };
        field(&mut header, 14, mode);
        field(&mut header, 54, filesize as u32);
        field(&mut header, 94, namesize as u32);
        header
    }

    fn pad4(len: usize) -> Vec<u8> {
        vec![0u8; (4 - (len % 4)) % 4]
    }

    fn build_entry(name: &str, mode: u32, data: &[u8]) -> Vec<u8> {
        let namesize = name.len() + 1;
        let mut out = Vec::new();
        out.extend_from_slice(&newc_header(mode, data.len(), namesize));
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        out.extend(pad4(HEADER_LEN + namesize));
        out.extend_from_slice(data);
        out.extend(pad4(data.len()));
        out
    }

    fn build_trailer() -> Vec<u8> {
        build_entry(TRAILER_NAME, 0, &[])
    }

    #[test]
    fn extracts_only_jar_regular_files() {
        let mut archive = Vec::new();
        archive.extend(build_entry("./usr/lib/app/lib.jar", S_IFREG | 0o644, b"jar-bytes"));
        archive.extend(build_entry("./usr/lib/app", S_IFMT & 0o040000 | 0o040000, &[]));
        archive.extend(build_entry("./usr/share/doc/readme.txt", S_IFREG | 0o644, b"not a jar"));
        archive.extend(build_trailer());

        let dir = tempfile::tempdir().unwrap();
        let jars = extract_jars(&archive[..], dir.path()).unwrap();

        assert_eq!(jars.len(), 1);
        let content = std::fs::read(&jars[0]).unwrap();
        assert_eq!(content, b"jar-bytes");
        assert!(jars[0].ends_with("usr/lib/app/lib.jar"));
    }

    #[test]
    fn empty_archive_is_just_a_trailer() {
        let archive = build_trailer();
        let dir = tempfile::tempdir().unwrap();
        let jars = extract_jars(&archive[..], dir.path()).unwrap();
        assert!(jars.is_empty());
    }
}

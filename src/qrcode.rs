#![forbid(unsafe_code)]
//! QR code encoding.
//!
//! Turns a byte payload into a QR Code Model 2 symbol at a caller-chosen version (type number)
//! and error correction level. Only byte mode is supported; the version is never chosen
//! automatically, so the side length of the result is a pure function of the version.
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;
use crate::matrix::ModuleMatrix;

/// Encodes `payload` as a byte-mode segment into a symbol of exactly `version`.
///
/// # Errors
///
/// Returns [`EncodingError::DataOverCapacity`] or [`EncodingError::SegmentTooLong`] if the payload
/// does not fit the version and error correction level.
///
/// # Example
///
/// ```rust
/// use qrender::qrcode::{encode, QrCodeEcc, Version};
///
/// let matrix = encode("HELLO", Version::new(1), QrCodeEcc::Low).unwrap();
/// assert_eq!(matrix.size(), 21);
/// ```
#[tracing::instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn encode(
    payload: &str,
    version: Version,
    ecl: QrCodeEcc,
) -> Result<ModuleMatrix, EncodingError> {
    let qr = QrCode::encode_text(payload, version, ecl)?;
    tracing::debug!(size = qr.size(), mask = qr.mask().value(), "encoded symbol");
    Ok(qr.to_matrix())
}

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// Instances are immutable after creation.
///
/// # Example
///
/// ```rust
/// use qrender::qrcode::{QrCode, QrCodeEcc, Version};
///
/// let qr = QrCode::encode_text("Hello, World!", Version::new(2), QrCodeEcc::Medium).unwrap();
/// assert_eq!(qr.size(), 25);
/// assert_eq!(qr.error_correction_level(), QrCodeEcc::Medium);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,

    /// The width and height of this QR Code, measured in modules, between
    /// 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: i32,

    ecl: QrCodeEcc,
    mask: Mask,

    /// The modules of this QR Code (false = light, true = dark), row-major.
    modules: Vec<bool>,

    /// Marks function modules, which masking must not touch. Only used during construction.
    isfunction: Vec<bool>,
}

impl QrCode {
    /// Encodes a text string's UTF-8 bytes.
    pub fn encode_text(
        text: &str,
        version: Version,
        ecl: QrCodeEcc,
    ) -> Result<Self, EncodingError> {
        Self::encode_bytes(text.as_bytes(), version, ecl, None)
    }

    /// Encodes arbitrary bytes in byte mode.
    ///
    /// The `mask` can be `None` for automatic selection by penalty score or a fixed pattern.
    pub fn encode_bytes(
        data: &[u8],
        version: Version,
        ecl: QrCodeEcc,
        mask: Option<Mask>,
    ) -> Result<Self, EncodingError> {
        let ccbits: u8 = num_char_count_bits(version);
        if data.len() >= 1usize << ccbits {
            return Err(EncodingError::SegmentTooLong);
        }
        let capacity_bits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
        let needed_bits: usize = 4 + usize::from(ccbits) + data.len() * 8;
        if needed_bits > capacity_bits {
            return Err(EncodingError::DataOverCapacity {
                needed_bits,
                capacity_bits,
            });
        }

        let mut bb = BitBuffer(Vec::with_capacity(capacity_bits));
        bb.append_bits(BYTE_MODE_BITS, 4);
        bb.append_bits(data.len() as u32, ccbits);
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        debug_assert_eq!(bb.0.len(), needed_bits);

        // Add terminator and pad up to a byte if applicable
        let numzerobits: usize = core::cmp::min(4, capacity_bits - bb.0.len());
        bb.append_bits(0, numzerobits as u8);
        let numzerobits: usize = bb.0.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);
        debug_assert_eq!(bb.0.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xec, 0x11].iter().cycle() {
            if bb.0.len() >= capacity_bits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }

        let mut datacodewords = vec![0u8; bb.0.len() / 8];
        for (i, &bit) in bb.0.iter().enumerate() {
            datacodewords[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        Ok(Self::encode_codewords(version, ecl, &datacodewords, mask))
    }

    /// Creates a new QR Code with the given version number,
    /// error correction level, data codeword bytes, and mask number.
    fn encode_codewords(
        ver: Version,
        ecl: QrCodeEcc,
        datacodewords: &[u8],
        msk: Option<Mask>,
    ) -> Self {
        let size = i32::from(ver.value()) * 4 + 17;
        let cells = (size * size) as usize;
        let mut result = Self {
            version: ver,
            size,
            ecl,
            mask: Mask::new(0),
            modules: vec![false; cells],
            isfunction: vec![false; cells],
        };

        result.draw_function_patterns();
        let allcodewords: Vec<u8> = result.add_ecc_and_interleave(datacodewords);
        result.draw_codewords(&allcodewords);

        let msk: Mask = msk.unwrap_or_else(|| {
            let mut best = Mask::new(0);
            let mut minpenalty = i32::MAX;
            for i in 0u8..8 {
                let candidate = Mask::new(i);
                result.apply_mask(candidate);
                result.draw_format_bits(candidate);
                let penalty: i32 = result.get_penalty_score();
                if penalty < minpenalty {
                    best = candidate;
                    minpenalty = penalty;
                }
                result.apply_mask(candidate); // Undoes the mask due to XOR
            }
            best
        });
        result.mask = msk;
        result.apply_mask(msk);
        result.draw_format_bits(msk);
        result.isfunction.clear();
        result.isfunction.shrink_to_fit();
        result
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns the error correction level decoded from the format information.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        let bits = self.read_format_data();
        QrCodeEcc::from_format_bits((bits >> 3) as u8)
    }

    /// Returns the mask decoded from the format information, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        Mask::new((self.read_format_data() & 7) as u8)
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.module(x, y)
    }

    /// Copies the symbol into a [`ModuleMatrix`] indexed by (row, col) = (y, x).
    pub fn to_matrix(&self) -> ModuleMatrix {
        ModuleMatrix::from_fn(self.size as usize, |row, col| {
            self.module(col as i32, row as i32)
        })
    }

    fn module(&self, x: i32, y: i32) -> bool {
        self.modules[(y * self.size + x) as usize]
    }

    /// Reads the five data bits of the first format information copy, unmasked.
    fn read_format_data(&self) -> u32 {
        // Bits 14..=10 live at x = 0..=4 on row 8.
        let mut bits: u32 = 0;
        for x in 0..5 {
            bits = (bits << 1) | u32::from(self.module(x, 8));
        }
        bits ^ (FORMAT_MASK >> 10)
    }

    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        let index = (y * self.size + x) as usize;
        self.modules[index] = isdark;
        self.isfunction[index] = true;
    }

    fn draw_function_patterns(&mut self) {
        // Timing patterns
        let size: i32 = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        // Finder patterns (three corners), overwriting some timing modules
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        // Alignment patterns, skipping the three finder corners
        let alignpatpos: Vec<i32> = self.get_alignment_pattern_positions();
        let numalign: usize = alignpatpos.len();
        for i in 0..numalign {
            for j in 0..numalign {
                let is_finder_corner = (i == 0 && j == 0)
                    || (i == 0 && j == numalign - 1)
                    || (i == numalign - 1 && j == 0);
                if !is_finder_corner {
                    self.draw_alignment_pattern(alignpatpos[i], alignpatpos[j]);
                }
            }
        }

        // Dummy format bits reserve the area; real ones are drawn after masking
        self.draw_format_bits(Mask::new(0));
        self.draw_version();
    }

    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let xx: i32 = x + dx;
                let yy: i32 = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist: i32 = dx.abs().max(dy.abs());
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    fn draw_version(&mut self) {
        let ver = u32::from(self.version.value());
        if ver < 7 {
            return;
        }
        let bits: u32 = {
            let mut rem: u32 = ver;
            for _ in 0..12 {
                rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
            }
            (ver << 12) | rem
        };
        for i in 0u8..18 {
            let bit: bool = get_bit(bits, i);
            let a: i32 = self.size - 11 + i32::from(i % 3);
            let b: i32 = i32::from(i / 3);
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    fn draw_format_bits(&mut self, mask: Mask) {
        let bits: u32 = {
            let data = u32::from((self.ecl.format_bits() << 3) | mask.value());
            let mut rem: u32 = data;
            for _ in 0..10 {
                rem = (rem << 1) ^ ((rem >> 9) * 0x537);
            }
            ((data << 10) | rem) ^ FORMAT_MASK
        };
        // First copy, around the top-left finder
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i as u8));
        }
        // Second copy, split between the other two finders
        let size: i32 = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i as u8));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i as u8));
        }
        self.set_function_module(8, size - 8, true); // Always dark
    }

    fn add_ecc_and_interleave(&self, data: &[u8]) -> Vec<u8> {
        let ver = self.version;
        let ecl = self.ecl;
        assert_eq!(data.len(), QrCode::get_num_data_codewords(ver, ecl));
        let numblocks: usize = QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let blockecclen: usize = QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let rawcodewords: usize = QrCode::get_num_raw_data_modules(ver) / 8;
        let numshortblocks: usize = numblocks - (rawcodewords % numblocks);
        let shortblockdatalen: usize = rawcodewords / numblocks - blockecclen;

        let mut result = vec![0u8; rawcodewords];
        let rs = ReedSolomonGenerator::new(blockecclen);
        let mut ecc = vec![0u8; blockecclen];
        let mut dat: &[u8] = data;
        for i in 0..numblocks {
            let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
            rs.compute_remainder(&dat[..datlen], &mut ecc);
            let mut k: usize = i;
            for (j, &b) in dat[..datlen].iter().enumerate() {
                if j == shortblockdatalen {
                    k -= numshortblocks;
                }
                result[k] = b;
                k += numblocks;
            }
            let mut k: usize = data.len() + i;
            for &b in &ecc {
                result[k] = b;
                k += numblocks;
            }
            dat = &dat[datlen..];
        }
        debug_assert_eq!(dat.len(), 0);
        result
    }

    fn draw_codewords(&mut self, data: &[u8]) {
        assert_eq!(
            data.len(),
            QrCode::get_num_raw_data_modules(self.version) / 8,
            "Illegal argument"
        );
        let size: i32 = self.size;
        let mut i: usize = 0;
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x: i32 = right - j;
                    let upward: bool = ((right + 1) & 2) == 0;
                    let y: i32 = if upward { size - 1 - vert } else { vert };
                    let index = (y * size + x) as usize;
                    if !self.isfunction[index] && i < data.len() * 8 {
                        self.modules[index] = get_bit(data[i >> 3].into(), 7 - ((i as u8) & 7));
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, data.len() * 8);
    }

    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let index = (y * self.size + x) as usize;
                if self.isfunction[index] {
                    continue;
                }
                let invert: bool = match mask.value() {
                    0 => (x + y) % 2 == 0,
                    1 => y % 2 == 0,
                    2 => x % 3 == 0,
                    3 => (x + y) % 3 == 0,
                    4 => (x / 3 + y / 2) % 2 == 0,
                    5 => ((x * y) % 2) + ((x * y) % 3) == 0,
                    6 => (((x * y) % 2) + ((x * y) % 3)) % 2 == 0,
                    7 => (((x + y) % 2) + ((x * y) % 3)) % 2 == 0,
                    _ => unreachable!(),
                };
                self.modules[index] ^= invert;
            }
        }
    }

    fn get_penalty_score(&self) -> i32 {
        let mut result: i32 = 0;
        let size: i32 = self.size;

        // Adjacent modules in row having same color, and finder-like patterns
        for y in 0..size {
            let mut runcolor = false;
            let mut runx: i32 = 0;
            let mut runhistory = FinderPenalty::new(size);
            for x in 0..size {
                if self.module(x, y) == runcolor {
                    runx += 1;
                    if runx == 5 {
                        result += PENALTY_N1;
                    } else if runx > 5 {
                        result += 1;
                    }
                } else {
                    runhistory.add_history(runx);
                    if !runcolor {
                        result += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = self.module(x, y);
                    runx = 1;
                }
            }
            result += runhistory.terminate_and_count(runcolor, runx) * PENALTY_N3;
        }
        // Adjacent modules in column having same color, and finder-like patterns
        for x in 0..size {
            let mut runcolor = false;
            let mut runy: i32 = 0;
            let mut runhistory = FinderPenalty::new(size);
            for y in 0..size {
                if self.module(x, y) == runcolor {
                    runy += 1;
                    if runy == 5 {
                        result += PENALTY_N1;
                    } else if runy > 5 {
                        result += 1;
                    }
                } else {
                    runhistory.add_history(runy);
                    if !runcolor {
                        result += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = self.module(x, y);
                    runy = 1;
                }
            }
            result += runhistory.terminate_and_count(runcolor, runy) * PENALTY_N3;
        }

        // 2*2 blocks of modules having same color
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color: bool = self.module(x, y);
                if color == self.module(x + 1, y)
                    && color == self.module(x, y + 1)
                    && color == self.module(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        // Balance of dark and light modules
        let dark = self.modules.iter().filter(|&&m| m).count() as i32;
        let total = size * size;
        let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;
        result
    }

    fn get_alignment_pattern_positions(&self) -> Vec<i32> {
        let ver = i32::from(self.version.value());
        if ver == 1 {
            return Vec::new();
        }
        let numalign: i32 = ver / 7 + 2;
        let step: i32 = if ver == 32 {
            26
        } else {
            (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
        };
        let mut result: Vec<i32> = (0..numalign - 1).map(|i| self.size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }

    fn get_num_raw_data_modules(ver: Version) -> usize {
        let ver = usize::from(ver.value());
        let mut result: usize = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let numalign: usize = ver / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        result
    }

    fn get_num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
        QrCode::get_num_raw_data_modules(ver) / 8
            - QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl)
                * QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
    }

    fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
        table[ecl.ordinal()][usize::from(ver.value())] as usize
    }
}

/// Largest payload, in bytes, that fits a version and ECC level in byte mode.
pub fn byte_capacity(version: Version, ecl: QrCodeEcc) -> usize {
    let ccbits = usize::from(num_char_count_bits(version));
    let capacity_bits = QrCode::get_num_data_codewords(version, ecl) * 8;
    ((capacity_bits - 4 - ccbits) / 8).min((1usize << ccbits) - 1)
}

fn num_char_count_bits(ver: Version) -> u8 {
    [8, 16, 16][usize::from((ver.value() + 7) / 17)]
}

const BYTE_MODE_BITS: u32 = 0x4;

const FORMAT_MASK: u32 = 0x5412;

struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    fn new(degree: usize) -> Self {
        assert!((1..=255).contains(&degree), "Degree out of range");
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Self::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Self::multiply(root, 0x02);
        }
        Self { divisor }
    }

    fn compute_remainder(&self, data: &[u8], result: &mut [u8]) {
        assert_eq!(result.len(), self.divisor.len());
        result.fill(0);
        for b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            result[result.len() - 1] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Self::multiply(y, factor);
            }
        }
    }

    fn multiply(x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}

struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Add light border to initial run
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    #[default]
    High,
}

impl QrCodeEcc {
    fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }

    fn from_format_bits(bits: u8) -> Self {
        use QrCodeEcc::*;
        match bits & 3 {
            1 => Low,
            0 => Medium,
            3 => Quartile,
            _ => High,
        }
    }

    /// The single-letter name used on the wire (`L`, `M`, `Q`, `H`).
    pub fn letter(self) -> char {
        use QrCodeEcc::*;
        match self {
            Low => 'L',
            Medium => 'M',
            Quartile => 'Q',
            High => 'H',
        }
    }
}

impl FromStr for QrCodeEcc {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use QrCodeEcc::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Low),
            "m" | "medium" => Ok(Medium),
            "q" | "quartile" => Ok(Quartile),
            "h" | "high" => Ok(High),
            other => Err(format!(
                "unknown error correction level \"{other}\" (expected L, M, Q or H)"
            )),
        }
    }
}

impl Serialize for QrCodeEcc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.letter())
    }
}

impl<'de> Deserialize<'de> for QrCodeEcc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

struct BitBuffer(Vec<bool>);

impl BitBuffer {
    fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0);
        self.0.extend((0..len).rev().map(|i| get_bit(val, i)));
    }
}

/// A QR code version (1–40), also called the type number.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40]. Use `Version::try_from` for
    /// untrusted input.
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of a symbol of this version, in modules.
    pub const fn side_len(self) -> usize {
        (self.0 as usize) * 4 + 17
    }
}

impl TryFrom<u8> for Version {
    type Error = EncodingError;

    fn try_from(ver: u8) -> Result<Self, Self::Error> {
        if (Version::MIN.value()..=Version::MAX.value()).contains(&ver) {
            Ok(Self(ver))
        } else {
            Err(EncodingError::VersionOutOfRange(ver))
        }
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }
}

fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

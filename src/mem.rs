// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use itertools::Itertools;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Range;

use crate::Error;

const PAGE_SIZE: usize = 512;

static EMPTY: [i64; PAGE_SIZE] = [0; PAGE_SIZE];

/// Convert an Intcode address into an index, rejecting negative addresses
fn index_of(address: i64) -> Result<usize, Error> {
    usize::try_from(address).map_err(|_| Error::InvalidAddress(address))
}

/// Split an index into its page number and the offset within that page
const fn locate(index: usize) -> (usize, usize) {
    (index / PAGE_SIZE, index % PAGE_SIZE)
}

/// Sparse, paged Intcode memory
///
/// Every non-negative address is readable, and reads zero if it was never written. Storage is
/// allocated in pages of 512 cells the first time a non-zero value is written into them, so
/// writing to a far-off address doesn't allocate everything before it.
#[derive(Clone, Default)]
pub struct Memory {
    pages: HashMap<usize, Box<[i64; PAGE_SIZE]>>,
    len: usize,
}

impl Memory {
    /// Create memory holding `program`
    #[must_use]
    pub fn new(program: &[i64]) -> Self {
        let mut mem = Self::default();
        mem.load(program);
        mem
    }

    /// One past the highest address that has been loaded or written
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been loaded or written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn page(&self, page_num: usize) -> &[i64; PAGE_SIZE] {
        self.pages.get(&page_num).map_or(&EMPTY, |page| page.as_ref())
    }

    /// Read the cell at `address`. Never allocates.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if `address` is negative.
    #[doc(alias = "peek")]
    pub fn read(&self, address: i64) -> Result<i64, Error> {
        let (page_num, offset) = locate(index_of(address)?);
        Ok(self.page(page_num)[offset])
    }

    /// Store `value` at `address`, allocating its page if needed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if `address` is negative.
    #[doc(alias = "poke")]
    pub fn write(&mut self, address: i64, value: i64) -> Result<(), Error> {
        let index = index_of(address)?;
        let (page_num, offset) = locate(index);
        self.len = self.len.max(index + 1);
        if let Some(page) = self.pages.get_mut(&page_num) {
            page[offset] = value;
        } else if value != 0 {
            log::trace!("allocating memory page at {:#x}", page_num * PAGE_SIZE);
            let mut page = Box::new([0; PAGE_SIZE]);
            page[offset] = value;
            self.pages.insert(page_num, page);
        }
        Ok(())
    }

    /// Replace the whole contents with `program`
    pub fn load(&mut self, program: &[i64]) {
        self.pages.clear();
        for (page_num, chunk) in program.chunks(PAGE_SIZE).enumerate() {
            let mut page = Box::new([0; PAGE_SIZE]);
            page[..chunk.len()].copy_from_slice(chunk);
            self.pages.insert(page_num, page);
        }
        self.len = program.len();
    }

    /// Get the cells within `range`, zero-filled where nothing was written
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] if the range starts at a negative address.
    pub fn range(&self, range: Range<i64>) -> Result<Cow<'_, [i64]>, Error> {
        let start = index_of(range.start)?;
        let end = index_of(range.end.max(range.start))?;
        if start == end {
            return Ok(Cow::Borrowed(&[]));
        }
        let (first_page, first) = locate(start);
        let (last_page, last) = locate(end - 1);
        if first_page == last_page {
            return Ok(Cow::Borrowed(&self.page(first_page)[first..=last]));
        }
        let mut v = Vec::with_capacity(end - start);
        v.extend_from_slice(&self.page(first_page)[first..]);
        for page_num in (first_page + 1)..last_page {
            v.extend_from_slice(self.page(page_num));
        }
        v.extend_from_slice(&self.page(last_page)[..=last]);
        Ok(Cow::Owned(v))
    }

    /// Page numbers of every page holding a non-zero cell
    fn active_pages(&self) -> BTreeSet<usize> {
        self.pages
            .iter()
            .filter_map(|(&n, page)| (page.as_ref() != &EMPTY).then_some(n))
            .collect()
    }
}

// unwritten cells read as zero, so only the non-zero contents are compared
impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        let active_pages = self.active_pages();
        other.active_pages() == active_pages
            && active_pages
                .into_iter()
                .all(|n| self.pages[&n] == other.pages[&n])
    }
}

impl Eq for Memory {}

impl FromIterator<i64> for Memory {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self::new(&iter.into_iter().collect::<Vec<_>>())
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Memory")?;
        let mut pages = fmt.debug_map();
        for n in self.active_pages() {
            let page = self.page(n);
            let used = page.iter().rposition(|&cell| cell != 0).map_or(0, |i| i + 1);
            pages.entry(
                &format_args!("{:#06x}", n * PAGE_SIZE),
                &format_args!("[{}]", page[..used].iter().format(",")),
            );
        }
        pages.finish()
    }
}

impl std::ops::Index<i64> for Memory {
    type Output = i64;

    /// Panics if `address` is negative
    fn index(&self, address: i64) -> &i64 {
        assert!(address >= 0, "intcode memory cannot be at a negative index");
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, reason = "checked above")]
        let (page_num, offset) = locate(address as usize);
        &self.page(page_num)[offset]
    }
}

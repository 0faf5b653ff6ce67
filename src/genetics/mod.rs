//! Genetics - heritable traits and mutation

pub mod genes;

pub use genes::{fuzz_genes, Genes, GENE_MAX, GENE_MIN};

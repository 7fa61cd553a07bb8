use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, NgramTokenizer, TextAnalyzer};
use tantivy::Index;

pub const CONTENT_TOKENIZER: &str = "ko_ngram";

pub fn build_schema() -> Schema {
    let mut schema_builder = Schema::builder();
    let _id_field = schema_builder.add_text_field("id", STRING | STORED);
    let _source_field = schema_builder.add_text_field("source", STRING | STORED);
    let _chunk_index_field = schema_builder.add_u64_field("chunk_index", STORED);
    let _total_chunks_field = schema_builder.add_u64_field("total_chunks", STORED);
    let content_indexing = TextFieldIndexing::default()
        .set_tokenizer(CONTENT_TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let content_options = TextOptions::default()
        .set_indexing_options(content_indexing)
        .set_stored();
    let _content_field = schema_builder.add_text_field("content", content_options);
    schema_builder.build()
}

/// Character 2..3-grams, lowercased. Korean queries agglutinate
/// particles onto the token ("15조에"), so whitespace tokenization
/// cannot match the indexed article headers ("제15조"); shared grams
/// can.
pub fn register_tokenizer(index: &Index) -> anyhow::Result<()> {
    let tokenizer = TextAnalyzer::builder(NgramTokenizer::new(2, 3, false)?)
        .filter(LowerCaser)
        .build();
    index.tokenizers().register(CONTENT_TOKENIZER, tokenizer);
    Ok(())
}

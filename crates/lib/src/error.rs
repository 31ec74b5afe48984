use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parser error")]
    ParserError(#[from] crate::parser::ParserError),
    #[error("Store error")]
    StoreError(#[from] crate::store::StoreError),
    #[error("Render error")]
    RasterError(#[from] crate::raster::RasterError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

mod csv;
mod docx;
mod json;
mod txt;

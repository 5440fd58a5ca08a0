pub mod labeler;

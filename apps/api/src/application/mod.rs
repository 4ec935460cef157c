pub mod analyze_drawing;

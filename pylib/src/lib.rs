use bingo_ocr::{Cell, Grid, Recognizer};
use pyo3::{create_exception, exceptions::PyException, prelude::*, wrap_pyfunction, PyErr};

create_exception!(pybingo_ocr, BingoOcrException, PyException);

/// Nested list of cell values: int for a number, None for the free
/// center, "ERR" where recognition failed.
fn grid_to_py(grid: &Grid, py: Python) -> PyObject {
    let rows: Vec<Vec<PyObject>> = grid
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Number(n) => n.to_object(py),
                    Cell::Free => py.None(),
                    Cell::Unrecognized => "ERR".to_object(py),
                })
                .collect()
        })
        .collect();
    rows.to_object(py)
}

#[pyfunction]
fn image_to_grid(image_path: String, py: Python) -> PyResult<PyObject> {
    let recognizer = Recognizer::from_env();
    let grid = recognizer
        .recognize_file(&image_path)
        .map_err(BingoOcrError::from)?;
    Ok(grid_to_py(&grid, py))
}

#[pyfunction]
fn train_templates_from_board(image_path: String, labels: Vec<String>) -> PyResult<bool> {
    let recognizer = Recognizer::from_env();
    let complete = recognizer
        .train_from_file(&image_path, &labels)
        .map_err(BingoOcrError::from)?;
    Ok(complete)
}

#[pyfunction]
fn templates_available() -> PyResult<bool> {
    Ok(Recognizer::from_env().templates_available())
}

/// Wrapper around bingo_ocr::Error so we convert to PyErr
struct BingoOcrError(bingo_ocr::Error);

impl From<bingo_ocr::Error> for BingoOcrError {
    fn from(err: bingo_ocr::Error) -> BingoOcrError {
        BingoOcrError(err)
    }
}

impl From<BingoOcrError> for PyErr {
    fn from(err: BingoOcrError) -> PyErr {
        PyErr::new::<BingoOcrException, String>(err.0.to_string())
    }
}

#[pymodule]
fn pybingo_ocr(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(image_to_grid, m)?)?;
    m.add_function(wrap_pyfunction!(train_templates_from_board, m)?)?;
    m.add_function(wrap_pyfunction!(templates_available, m)?)?;
    Ok(())
}

//! Illustrative pandas / scikit-learn snippets attached to recommendations.
//!
//! Snippets are static templates with the column name substituted. They are
//! shown to the user and never executed.

use crate::types::Technique;

/// Fill strategy used by the imputation snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FillStrategy {
    Median,
    Mode,
}

/// Escape a column name for use inside a single-quoted Python string.
pub(crate) fn escape_python(column: &str) -> String {
    column.replace('\\', "\\\\").replace('\'', "\\'")
}

pub(crate) fn example_code(technique: Technique, column: &str, fill: FillStrategy) -> String {
    let c = escape_python(column);
    match technique {
        Technique::StandardScale => format!(
            "from sklearn.preprocessing import StandardScaler\n\n\
             df[['{c}']] = StandardScaler().fit_transform(df[['{c}']])"
        ),
        Technique::RobustScale => format!(
            "from sklearn.preprocessing import RobustScaler\n\n\
             df[['{c}']] = RobustScaler().fit_transform(df[['{c}']])"
        ),
        Technique::LogTransform => format!(
            "import numpy as np\n\n\
             df['{c}'] = np.log1p(df['{c}'])"
        ),
        Technique::PowerTransform => format!(
            "from sklearn.preprocessing import PowerTransformer\n\n\
             df[['{c}']] = PowerTransformer(method='yeo-johnson').fit_transform(df[['{c}']])"
        ),
        Technique::OneHotEncode => format!(
            "import pandas as pd\n\n\
             df = pd.get_dummies(df, columns=['{c}'], prefix='{c}')"
        ),
        Technique::FrequencyEncode => format!(
            "freq = df['{c}'].value_counts(normalize=True)\n\
             df['{c}_freq'] = df['{c}'].map(freq)"
        ),
        Technique::BinaryEncode => format!(
            "df['{c}'] = df['{c}'].astype('category').cat.codes"
        ),
        Technique::DatetimeFeatures => format!(
            "import pandas as pd\n\n\
             ts = pd.to_datetime(df['{c}'], errors='coerce')\n\
             df['{c}_year'] = ts.dt.year\n\
             df['{c}_month'] = ts.dt.month\n\
             df['{c}_day'] = ts.dt.day\n\
             df['{c}_weekday'] = ts.dt.weekday"
        ),
        Technique::Impute => match fill {
            FillStrategy::Median => {
                format!("df['{c}'] = df['{c}'].fillna(df['{c}'].median())")
            }
            FillStrategy::Mode => {
                format!("df['{c}'] = df['{c}'].fillna(df['{c}'].mode().iloc[0])")
            }
        },
        Technique::DropColumn => format!("df = df.drop(columns=['{c}'])"),
    }
}

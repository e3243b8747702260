//! Saturation points over the volatile chemicals of a stream.

use crate::error::StreamResult;
use crate::stream::Stream;
use pf_thermo::{BubblePoint, DewPoint, SaturationPoint};

impl Stream {
    /// Registry indices of chemicals that are volatile and present.
    pub fn equilibrium_indices(&self) -> Vec<usize> {
        self.chemicals().equilibrium_indices(&self.mol())
    }

    pub fn equilibrium_chemicals(&self) -> Vec<String> {
        self.equilibrium_indices()
            .into_iter()
            .filter_map(|i| self.chemicals().get(i).map(|c| c.id.clone()))
            .collect()
    }

    /// Mole fractions of the equilibrium chemicals.
    ///
    /// # Panics
    /// Panics when no equilibrium chemical carries flow.
    pub fn z_equilibrium_chemicals(&self) -> Vec<f64> {
        let mol = self.mol();
        let values: Vec<f64> = self.equilibrium_indices().iter().map(|&i| mol[i]).collect();
        let total: f64 = values.iter().sum();
        assert!(total != 0.0, "stream has no equilibrium chemicals");
        values.iter().map(|v| v / total).collect()
    }

    pub fn bubble_point(&self) -> StreamResult<BubblePoint> {
        Ok(BubblePoint::new(self.chemicals(), &self.equilibrium_indices())?)
    }

    pub fn dew_point(&self) -> StreamResult<DewPoint> {
        Ok(DewPoint::new(self.chemicals(), &self.equilibrium_indices())?)
    }

    /// Bubble point at `t` [K], or at the stream temperature.
    pub fn bubble_point_at_t(&self, t: Option<f64>) -> StreamResult<SaturationPoint> {
        let z = self.z_equilibrium_chemicals();
        Ok(self.bubble_point()?.solve_p(&z, t.unwrap_or(self.t()))?)
    }

    /// Bubble point at `p` [Pa], or at the stream pressure.
    pub fn bubble_point_at_p(&self, p: Option<f64>) -> StreamResult<SaturationPoint> {
        let z = self.z_equilibrium_chemicals();
        Ok(self.bubble_point()?.solve_t(&z, p.unwrap_or(self.p()))?)
    }

    /// Dew point at `t` [K], or at the stream temperature.
    pub fn dew_point_at_t(&self, t: Option<f64>) -> StreamResult<SaturationPoint> {
        let z = self.z_equilibrium_chemicals();
        Ok(self.dew_point()?.solve_p(&z, t.unwrap_or(self.t()))?)
    }

    /// Dew point at `p` [Pa], or at the stream pressure.
    pub fn dew_point_at_p(&self, p: Option<f64>) -> StreamResult<SaturationPoint> {
        let z = self.z_equilibrium_chemicals();
        Ok(self.dew_point()?.solve_t(&z, p.unwrap_or(self.p()))?)
    }

    /// Bubble point temperature [K] at the stream pressure.
    pub fn t_bubble(&self) -> StreamResult<f64> {
        Ok(self.bubble_point_at_p(None)?.t)
    }

    /// Bubble point pressure [Pa] at the stream temperature.
    pub fn p_bubble(&self) -> StreamResult<f64> {
        Ok(self.bubble_point_at_t(None)?.p)
    }

    /// Dew point temperature [K] at the stream pressure.
    pub fn t_dew(&self) -> StreamResult<f64> {
        Ok(self.dew_point_at_p(None)?.t)
    }

    /// Dew point pressure [Pa] at the stream temperature.
    pub fn p_dew(&self) -> StreamResult<f64> {
        Ok(self.dew_point_at_t(None)?.p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_thermo::Thermo;

    fn stream(flows: Vec<f64>) -> Stream {
        Stream::builder()
            .thermo(Thermo::from_catalog(&["Water", "Ethanol", "Glucose"]).unwrap())
            .flow(flows)
            .build()
            .unwrap()
    }

    #[test]
    fn non_volatile_and_absent_chemicals_are_excluded() {
        let s = stream(vec![10.0, 0.0, 1.0]);
        assert_eq!(s.equilibrium_chemicals(), vec!["Water".to_string()]);
        assert_eq!(s.z_equilibrium_chemicals(), vec![1.0]);
    }

    #[test]
    fn pure_water_boils_near_its_normal_boiling_point() {
        let s = stream(vec![1.0, 0.0, 0.0]);
        let tb = s.t_bubble().unwrap();
        assert!((tb - 373.15).abs() < 0.5, "Tb = {tb}");
        assert!((s.t_dew().unwrap() - tb).abs() < 1e-6);
    }

    #[test]
    fn mixture_bubble_below_dew() {
        let s = stream(vec![10.0, 5.0, 0.0]);
        let t_bubble = s.t_bubble().unwrap();
        let t_dew = s.t_dew().unwrap();
        assert!(t_bubble < t_dew);
        assert!(t_bubble > 351.0 && t_dew < 374.0);
        assert!(s.p_bubble().unwrap() > s.p_dew().unwrap());
        let point = s.bubble_point_at_t(Some(350.0)).unwrap();
        assert_eq!(point.t, 350.0);
        assert!((point.composition.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "no equilibrium chemicals")]
    fn degenerate_composition_is_fatal() {
        let s = stream(vec![0.0, 0.0, 2.0]);
        s.z_equilibrium_chemicals();
    }
}
